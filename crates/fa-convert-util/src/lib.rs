// typed indices into plain Vecs, so ids into different tables can't be mixed up
#[macro_export]
macro_rules! make_type_idx {
    ($type_idx_name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub(crate) struct $type_idx_name(u32);

        impl $type_idx_name {
            pub(crate) fn from_push<T>(vec: &mut Vec<T>, val: T) -> $type_idx_name {
                let idx = $type_idx_name(vec.len() as u32);
                vec.push(val);
                idx
            }

            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl<T> std::ops::Index<$type_idx_name> for [T] {
            type Output = T;

            fn index(&self, index: $type_idx_name) -> &Self::Output {
                &self[index.0 as usize]
            }
        }

        impl<T> std::ops::IndexMut<$type_idx_name> for [T] {
            fn index_mut(&mut self, index: $type_idx_name) -> &mut Self::Output {
                &mut self[index.0 as usize]
            }
        }

        impl<T> std::ops::Index<$type_idx_name> for Vec<T> {
            type Output = T;

            fn index(&self, index: $type_idx_name) -> &Self::Output {
                &self.as_slice()[index]
            }
        }

        impl<T> std::ops::IndexMut<$type_idx_name> for Vec<T> {
            fn index_mut(&mut self, index: $type_idx_name) -> &mut Self::Output {
                &mut self.as_mut_slice()[index]
            }
        }
    };
}
