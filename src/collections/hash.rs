//! Deterministic djb2 hashing over the raw bytes of a key.

/// Seed of the djb2 hash.
pub const DJB2_SEED: u64 = 5381;

/// Keys that can be hashed by their in-memory byte representation.
///
/// The bytes are the native-endian representation of the value, so the hash is
/// stable for the lifetime of a process and covers exactly `size_of::<K>()`
/// bytes.
pub trait RawKey: Copy + Eq {
    /// Byte representation fed to the hash.
    type Bytes: AsRef<[u8]>;

    fn raw_bytes(&self) -> Self::Bytes;
}

macro_rules! impl_raw_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl RawKey for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                #[inline]
                fn raw_bytes(&self) -> Self::Bytes {
                    self.to_ne_bytes()
                }
            }
        )*
    };
}

impl_raw_key!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// djb2: `h = h * 33 + byte`, starting from [`DJB2_SEED`], with wrapping arithmetic.
#[inline]
pub fn djb2(bytes: &[u8]) -> u64 {
    bytes.iter().fold(DJB2_SEED, |hash, &byte| {
        (hash << 5).wrapping_add(hash).wrapping_add(u64::from(byte))
    })
}

/// Hash a key by its raw bytes.
#[inline]
pub fn hash_key<K: RawKey>(key: &K) -> u64 {
    djb2(key.raw_bytes().as_ref())
}
