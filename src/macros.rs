//! Macros used in hkp-client.

pub(crate) trait Sendable : Send {}
pub(crate) trait Syncable : Sync {}

/// A simple shortcut for ensuring a type is Send and Sync.
///
/// Call it after defining the type:
///
/// ```ignore
/// pub struct MyStruct {}
/// assert_send_and_sync!(MyStruct);
/// ```
macro_rules! assert_send_and_sync {
    ( $t:ty ) => {
        impl crate::macros::Sendable for $t {}
        impl crate::macros::Syncable for $t {}
    };
}
