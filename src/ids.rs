macro_rules! impl_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(usize);

        impl $name {
            /// Create a new id.
            #[inline]
            pub const fn new(index: usize) -> Self {
                $name(index)
            }

            /// Get the id as usize.
            #[inline]
            pub fn as_usize(&self) -> usize {
                self.0
            }
        }

        impl<T> std::ops::Index<$name> for [T] {
            type Output = T;

            #[inline]
            fn index(&self, index: $name) -> &Self::Output {
                &self[index.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for [T] {
            #[inline]
            fn index_mut(&mut self, index: $name) -> &mut T {
                &mut self[index.0]
            }
        }

        impl<T> std::ops::Index<$name> for Vec<T> {
            type Output = T;

            #[inline]
            fn index(&self, index: $name) -> &Self::Output {
                &self[index.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for Vec<T> {
            #[inline]
            fn index_mut(&mut self, index: $name) -> &mut T {
                &mut self[index.0]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<usize> for $name {
            fn from(index: usize) -> Self {
                $name::new(index)
            }
        }
    };
}

impl_id!(NfaStateID, "The identity of a state in an NFA arena.");
impl_id!(DfaStateID, "The identity of a DFA state. The start state is always 0.");
impl_id!(TokenID, "The position of a token definition in declaration order.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_indexing() {
        let v = vec!['a', 'b', 'c'];
        assert_eq!(v[NfaStateID::new(1)], 'b');
        assert_eq!(v[..][DfaStateID::new(2)], 'c');
        assert_eq!(TokenID::from(7).as_usize(), 7);
        assert_eq!(NfaStateID::new(4).to_string(), "4");
    }
}
