//! BLS signatures over BLS12-381.
//!
//! Signatures live in G1 (48-byte compressed encoding) and public keys in G2
//! (96-byte compressed encoding). Messages are mapped to G1 with a
//! try-and-increment hash, see [`hash_to_g1`].

/// Implements borsh, serde, `Debug` and `Display` for a point wrapper in terms
/// of its `to_bytes` / `from_bytes` pair.
macro_rules! impl_point_codecs {
    ($name:ident, $len:expr) => {
        impl ::borsh::BorshSerialize for $name {
            fn serialize<W: ::std::io::Write>(&self, writer: &mut W) -> ::std::io::Result<()> {
                writer.write_all(&self.to_bytes())
            }
        }

        impl ::borsh::BorshDeserialize for $name {
            fn deserialize_reader<R: ::std::io::Read>(reader: &mut R) -> ::std::io::Result<Self> {
                let mut buf = [0u8; $len];
                reader.read_exact(&mut buf)?;
                Self::from_bytes(&buf)
                    .map_err(|e| ::std::io::Error::new(::std::io::ErrorKind::InvalidData, e))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                serializer.serialize_str(&::hex::encode(self.to_bytes()))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let s = <::std::string::String as ::serde::Deserialize>::deserialize(deserializer)?;
                let hex_str = s.strip_prefix("0x").unwrap_or(&s);
                let bytes = ::hex::decode(hex_str).map_err(::serde::de::Error::custom)?;
                Self::from_bytes(&bytes).map_err(::serde::de::Error::custom)
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({})", stringify!($name), ::hex::encode(self.to_bytes()))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                let bytes = self.to_bytes();
                f.write_str(&::hex::encode(&bytes[..4]))?;
                f.write_str("..")?;
                f.write_str(&::hex::encode(&bytes[$len - 4..]))
            }
        }
    };
}

mod errors;
mod hash;
mod keys;
mod signature;

pub use errors::BlsError;
pub use hash::{hash_to_g1, BLS_SIG_DST};
pub use keys::{BlsPubKey, BlsSecretKey};
pub use signature::BlsSignature;
