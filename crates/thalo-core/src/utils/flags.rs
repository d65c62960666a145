// Copyright 2025 thalo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A small declaration macro for typed bitflag sets.
//!
//! Usage descriptors ([`TextureUsage`](crate::gfx::api::texture::TextureUsage),
//! [`BufferUsage`](crate::gfx::api::buffer::BufferUsage)) are flag sets, not
//! enums: a resource is usually created for several roles at once. The macro
//! generates a transparent newtype over the chosen integer width with `const`
//! flag values and the usual set operations.

/// Declares a bitflag newtype.
///
/// ```
/// thalo_core::thalo_bitflags! {
///     /// Example flag set.
///     pub struct Caps: u32 {
///         /// First capability.
///         const A = 1 << 0;
///         /// Second capability.
///         const B = 1 << 1;
///     }
/// }
///
/// let both = Caps::A | Caps::B;
/// assert!(both.contains(Caps::A));
/// ```
#[macro_export]
macro_rules! thalo_bitflags {
    (
        $(#[$outer:meta])*
        $vis:vis struct $name:ident: $ty:ty {
            $(
                $(#[$inner:meta])*
                const $flag:ident = $value:expr;
            )*
        }
    ) => {
        $(#[$outer])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $name {
            bits: $ty,
        }

        impl $name {
            $(
                $(#[$inner])*
                pub const $flag: Self = Self { bits: $value };
            )*

            /// The empty flag set.
            pub const fn empty() -> Self {
                Self { bits: 0 }
            }

            /// Creates a flag set from raw bits. Unknown bits are kept.
            pub const fn from_bits(bits: $ty) -> Self {
                Self { bits }
            }

            /// Returns the raw bits.
            pub const fn bits(&self) -> $ty {
                self.bits
            }

            /// Returns `true` if no flag is set.
            pub const fn is_empty(&self) -> bool {
                self.bits == 0
            }

            /// Returns `true` if every flag in `other` is also set in `self`.
            pub const fn contains(&self, other: Self) -> bool {
                (self.bits & other.bits) == other.bits
            }

            /// Returns `true` if at least one flag in `other` is set in `self`.
            pub const fn intersects(&self, other: Self) -> bool {
                (self.bits & other.bits) != 0
            }

            /// The union of both flag sets.
            pub const fn union(self, other: Self) -> Self {
                Self { bits: self.bits | other.bits }
            }
        }

        impl ::core::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                self.union(rhs)
            }
        }

        impl ::core::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                *self = self.union(rhs);
            }
        }

        impl ::core::ops::BitAnd for $name {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self {
                Self { bits: self.bits & rhs.bits }
            }
        }

        impl ::core::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, concat!(stringify!($name), "({:#x})"), self.bits)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    thalo_bitflags! {
        /// Test flags.
        pub struct TestFlags: u32 {
            /// Bit zero.
            const ONE = 1 << 0;
            /// Bit one.
            const TWO = 1 << 1;
            /// Bit two.
            const FOUR = 1 << 2;
        }
    }

    #[test]
    fn set_operations() {
        let combined = TestFlags::ONE | TestFlags::FOUR;
        assert!(combined.contains(TestFlags::ONE));
        assert!(combined.contains(TestFlags::FOUR));
        assert!(!combined.contains(TestFlags::TWO));
        assert!(combined.intersects(TestFlags::ONE | TestFlags::TWO));
        assert!(!combined.intersects(TestFlags::TWO));
    }

    #[test]
    fn empty_and_bits() {
        assert!(TestFlags::empty().is_empty());
        assert_eq!((TestFlags::ONE | TestFlags::TWO).bits(), 0b11);
        assert_eq!(TestFlags::from_bits(0b101), TestFlags::ONE | TestFlags::FOUR);
    }

    #[test]
    fn debug_format_shows_hex() {
        assert_eq!(format!("{:?}", TestFlags::FOUR), "TestFlags(0x4)");
    }
}
