//! Fixed-size byte buffers.

/// A 20-byte buffer.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Buf20(pub [u8; 20]);

impl_buf_core!(Buf20, 20);
impl_buf_fmt!(Buf20, 20);
impl_buf_borsh!(Buf20, 20);
impl_buf_arbitrary!(Buf20, 20);
impl_buf_serde!(Buf20, 20);

/// A 32-byte buffer.
///
/// This is useful for hashes, transaction IDs, secret and public keys.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Buf32(pub [u8; 32]);

impl_buf_core!(Buf32, 32);
impl_buf_fmt!(Buf32, 32);
impl_buf_borsh!(Buf32, 32);
impl_buf_arbitrary!(Buf32, 32);
impl_buf_serde!(Buf32, 32);
