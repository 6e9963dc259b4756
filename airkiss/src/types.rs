//! Core type definitions for the AirKiss decoder.
//!
//! Provides zero-cost newtypes to prevent field mixups at compile time;
//! `put(frame_len, seq_no)` takes two `u16`-shaped values whose accidental
//! transposition would otherwise decode garbage silently.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Macro to generate protocol newtype wrappers with common implementations.
macro_rules! airkiss_newtype {
    (
        $(#[$meta:meta])*
        $name:ident($inner:ty) => $prefix:literal
        $(, custom_methods: { $($custom:tt)* })?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[derive(Serialize, Deserialize)]
        #[repr(transparent)]
        pub struct $name(pub $inner);

        impl $name {
            /// Creates a new instance
            #[inline]
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            /// Raw value
            #[inline]
            pub const fn value(self) -> $inner {
                self.0
            }

            $($($custom)*)?
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline]
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $inner {
            #[inline]
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<$inner> for $name {
            #[inline]
            fn eq(&self, other: &$inner) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for $inner {
            #[inline]
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

airkiss_newtype!(
    /// 802.11 sequence number with wrapping arithmetic support.
    SequenceNumber(u16) => "SN",
    custom_methods: {
        /// Wrapping addition
        #[inline]
        pub const fn wrapping_add(self, rhs: u16) -> Self {
            Self(self.0.wrapping_add(rhs))
        }
    }
);

airkiss_newtype!(
    /// Observed length of one captured 802.11 frame.
    FrameLength(u16) => "LEN"
);
