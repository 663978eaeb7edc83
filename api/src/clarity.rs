use crate::address::StacksAddress;
use crate::error::{Error, Result};

/// Maximum nesting depth accepted when deserializing.
const MAX_DEPTH: usize = 32;

/// Clarity type tags (SIP-005 wire format).
const TAG_INT: u8 = 0x00;
const TAG_UINT: u8 = 0x01;
const TAG_BUFFER: u8 = 0x02;
const TAG_TRUE: u8 = 0x03;
const TAG_FALSE: u8 = 0x04;
const TAG_PRINCIPAL: u8 = 0x05;
const TAG_CONTRACT_PRINCIPAL: u8 = 0x06;
const TAG_RESPONSE_OK: u8 = 0x07;
const TAG_RESPONSE_ERR: u8 = 0x08;
const TAG_NONE: u8 = 0x09;
const TAG_SOME: u8 = 0x0a;
const TAG_LIST: u8 = 0x0b;
const TAG_TUPLE: u8 = 0x0c;
const TAG_STRING_ASCII: u8 = 0x0d;
const TAG_STRING_UTF8: u8 = 0x0e;

/// A Clarity value, as passed to and returned from contract calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Int(i128),
    UInt(u128),
    Buffer(Vec<u8>),
    Bool(bool),
    Principal(StacksAddress),
    ContractPrincipal(StacksAddress, String),
    ResponseOk(Box<Value>),
    ResponseErr(Box<Value>),
    OptionalNone,
    OptionalSome(Box<Value>),
    List(Vec<Value>),
    Tuple(Vec<(String, Value)>),
    StringAscii(String),
    StringUtf8(String),
}

impl Value {
    pub fn uint(n: impl Into<u128>) -> Self {
        Value::UInt(n.into())
    }

    pub fn none() -> Self {
        Value::OptionalNone
    }

    pub fn some(value: Value) -> Self {
        Value::OptionalSome(Box::new(value))
    }

    pub fn string_utf8(s: impl Into<String>) -> Self {
        Value::StringUtf8(s.into())
    }

    pub fn principal(address: StacksAddress) -> Self {
        Value::Principal(address)
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Buffer(_) => "buffer",
            Value::Bool(_) => "bool",
            Value::Principal(_) => "principal",
            Value::ContractPrincipal(..) => "contract principal",
            Value::ResponseOk(_) => "response ok",
            Value::ResponseErr(_) => "response err",
            Value::OptionalNone => "none",
            Value::OptionalSome(_) => "some",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::StringAscii(_) => "string-ascii",
            Value::StringUtf8(_) => "string-utf8",
        }
    }

    pub fn as_u128(&self) -> Result<u128> {
        match self {
            Value::UInt(n) => Ok(*n),
            other => Err(Error::UnexpectedType {
                expected: "uint",
                got: other.type_name(),
            }),
        }
    }

    pub fn as_u64(&self) -> Result<u64> {
        Ok(self.as_u128()? as u64)
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(Error::UnexpectedType {
                expected: "bool",
                got: other.type_name(),
            }),
        }
    }

    /// Unwraps `(some v)` to `Some(v)` and `none` to `None`.
    pub fn as_optional(&self) -> Result<Option<&Value>> {
        match self {
            Value::OptionalNone => Ok(None),
            Value::OptionalSome(inner) => Ok(Some(inner)),
            other => Err(Error::UnexpectedType {
                expected: "optional",
                got: other.type_name(),
            }),
        }
    }

    /// Unwraps a response, mapping `(err v)` to `Error::ContractErr`.
    pub fn into_response(self) -> Result<Value> {
        match self {
            Value::ResponseOk(inner) => Ok(*inner),
            Value::ResponseErr(inner) => Err(Error::ContractErr(format!("{inner:?}"))),
            other => Err(Error::UnexpectedType {
                expected: "response",
                got: other.type_name(),
            }),
        }
    }

    /// Looks up a field in a tuple value.
    pub fn tuple_get(&self, name: &str) -> Result<&Value> {
        match self {
            Value::Tuple(entries) => entries
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value)
                .ok_or_else(|| Error::MissingTupleKey(name.to_string())),
            other => Err(Error::UnexpectedType {
                expected: "tuple",
                got: other.type_name(),
            }),
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }

    /// Hex encoding with the `0x` prefix the node API uses.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.serialize()))
    }

    fn write(&self, out: &mut Vec<u8>) {
        match self {
            Value::Int(n) => {
                out.push(TAG_INT);
                out.extend_from_slice(&n.to_be_bytes());
            }
            Value::UInt(n) => {
                out.push(TAG_UINT);
                out.extend_from_slice(&n.to_be_bytes());
            }
            Value::Buffer(bytes) => {
                out.push(TAG_BUFFER);
                out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
                out.extend_from_slice(bytes);
            }
            Value::Bool(true) => out.push(TAG_TRUE),
            Value::Bool(false) => out.push(TAG_FALSE),
            Value::Principal(address) => {
                out.push(TAG_PRINCIPAL);
                out.push(address.version);
                out.extend_from_slice(&address.hash160);
            }
            Value::ContractPrincipal(address, name) => {
                out.push(TAG_CONTRACT_PRINCIPAL);
                out.push(address.version);
                out.extend_from_slice(&address.hash160);
                out.push(name.len() as u8);
                out.extend_from_slice(name.as_bytes());
            }
            Value::ResponseOk(inner) => {
                out.push(TAG_RESPONSE_OK);
                inner.write(out);
            }
            Value::ResponseErr(inner) => {
                out.push(TAG_RESPONSE_ERR);
                inner.write(out);
            }
            Value::OptionalNone => out.push(TAG_NONE),
            Value::OptionalSome(inner) => {
                out.push(TAG_SOME);
                inner.write(out);
            }
            Value::List(items) => {
                out.push(TAG_LIST);
                out.extend_from_slice(&(items.len() as u32).to_be_bytes());
                for item in items {
                    item.write(out);
                }
            }
            Value::Tuple(entries) => {
                out.push(TAG_TUPLE);
                out.extend_from_slice(&(entries.len() as u32).to_be_bytes());
                for (key, value) in entries {
                    out.push(key.len() as u8);
                    out.extend_from_slice(key.as_bytes());
                    value.write(out);
                }
            }
            Value::StringAscii(s) => {
                out.push(TAG_STRING_ASCII);
                out.extend_from_slice(&(s.len() as u32).to_be_bytes());
                out.extend_from_slice(s.as_bytes());
            }
            Value::StringUtf8(s) => {
                out.push(TAG_STRING_UTF8);
                out.extend_from_slice(&(s.len() as u32).to_be_bytes());
                out.extend_from_slice(s.as_bytes());
            }
        }
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Value> {
        let mut reader = Reader { bytes, pos: 0 };
        let value = reader.read_value(0)?;
        if reader.pos != bytes.len() {
            return Err(Error::TrailingBytes);
        }
        Ok(value)
    }

    /// Parses the `0x`-prefixed hex the node API returns.
    pub fn from_hex(s: &str) -> Result<Value> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped).map_err(|e| Error::InvalidHex(e.to_string()))?;
        Value::deserialize(&bytes)
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take(&mut self, n: usize) -> Result<&[u8]> {
        if self.pos + n > self.bytes.len() {
            return Err(Error::Truncated(self.pos));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes(bytes.try_into().unwrap()))
    }

    fn read_string(&mut self, len: usize) -> Result<String> {
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| Error::InvalidString)
    }

    fn read_address(&mut self) -> Result<StacksAddress> {
        let version = self.read_u8()?;
        let hash: [u8; 20] = self.take(20)?.try_into().unwrap();
        Ok(StacksAddress {
            version,
            hash160: hash,
        })
    }

    fn read_value(&mut self, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(Error::TooDeep);
        }
        let tag = self.read_u8()?;
        match tag {
            TAG_INT => {
                let bytes = self.take(16)?;
                Ok(Value::Int(i128::from_be_bytes(bytes.try_into().unwrap())))
            }
            TAG_UINT => {
                let bytes = self.take(16)?;
                Ok(Value::UInt(u128::from_be_bytes(bytes.try_into().unwrap())))
            }
            TAG_BUFFER => {
                let len = self.read_u32()? as usize;
                Ok(Value::Buffer(self.take(len)?.to_vec()))
            }
            TAG_TRUE => Ok(Value::Bool(true)),
            TAG_FALSE => Ok(Value::Bool(false)),
            TAG_PRINCIPAL => Ok(Value::Principal(self.read_address()?)),
            TAG_CONTRACT_PRINCIPAL => {
                let address = self.read_address()?;
                let name_len = self.read_u8()? as usize;
                let name = self.read_string(name_len)?;
                Ok(Value::ContractPrincipal(address, name))
            }
            TAG_RESPONSE_OK => Ok(Value::ResponseOk(Box::new(self.read_value(depth + 1)?))),
            TAG_RESPONSE_ERR => Ok(Value::ResponseErr(Box::new(self.read_value(depth + 1)?))),
            TAG_NONE => Ok(Value::OptionalNone),
            TAG_SOME => Ok(Value::OptionalSome(Box::new(self.read_value(depth + 1)?))),
            TAG_LIST => {
                let count = self.read_u32()? as usize;
                let mut items = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    items.push(self.read_value(depth + 1)?);
                }
                Ok(Value::List(items))
            }
            TAG_TUPLE => {
                let count = self.read_u32()? as usize;
                let mut entries = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    let key_len = self.read_u8()? as usize;
                    let key = self.read_string(key_len)?;
                    entries.push((key, self.read_value(depth + 1)?));
                }
                Ok(Value::Tuple(entries))
            }
            TAG_STRING_ASCII => {
                let len = self.read_u32()? as usize;
                Ok(Value::StringAscii(self.read_string(len)?))
            }
            TAG_STRING_UTF8 => {
                let len = self.read_u32()? as usize;
                Ok(Value::StringUtf8(self.read_string(len)?))
            }
            other => Err(Error::UnknownTypeTag(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uint_wire_format() {
        assert_eq!(
            Value::uint(5_000_000u64).to_hex(),
            "0x01000000000000000000000000004c4b40"
        );
        assert_eq!(
            Value::uint(0u64).to_hex(),
            format!("0x01{}", "00".repeat(16))
        );
    }

    #[test]
    fn bool_and_optional_wire_format() {
        assert_eq!(Value::Bool(true).to_hex(), "0x03");
        assert_eq!(Value::Bool(false).to_hex(), "0x04");
        assert_eq!(Value::none().to_hex(), "0x09");
        assert_eq!(
            Value::some(Value::uint(1u64)).to_hex(),
            "0x0a0100000000000000000000000000000001"
        );
    }

    #[test]
    fn some_string_utf8_wire_format() {
        // The register-user memo argument for "hello".
        assert_eq!(
            Value::some(Value::string_utf8("hello")).to_hex(),
            "0x0a0e0000000568656c6c6f"
        );
    }

    #[test]
    fn parses_ok_response_with_stats_tuple() {
        let tuple = Value::Tuple(vec![
            ("amount".into(), Value::uint(5_000_000u64)),
            ("amountToCity".into(), Value::uint(1_500_000u64)),
            ("amountToStackers".into(), Value::uint(3_500_000u64)),
            ("minersCount".into(), Value::uint(12u64)),
            ("rewardClaimed".into(), Value::Bool(false)),
        ]);
        let wire = Value::ResponseOk(Box::new(tuple.clone())).to_hex();

        let parsed = Value::from_hex(&wire).unwrap().into_response().unwrap();
        assert_eq!(
            parsed.tuple_get("amount").unwrap().as_u128().unwrap(),
            5_000_000
        );
        assert_eq!(
            parsed
                .tuple_get("rewardClaimed")
                .unwrap()
                .as_bool()
                .unwrap(),
            false
        );
        assert!(matches!(
            parsed.tuple_get("missing"),
            Err(Error::MissingTupleKey(_))
        ));
    }

    #[test]
    fn err_response_maps_to_contract_err() {
        let wire = Value::ResponseErr(Box::new(Value::uint(2003u64))).to_hex();
        let err = Value::from_hex(&wire).unwrap().into_response().unwrap_err();
        assert!(matches!(err, Error::ContractErr(_)));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            Value::from_hex("0x01ff"),
            Err(Error::Truncated(_))
        ));
        assert!(matches!(
            Value::from_hex("0x0f"),
            Err(Error::UnknownTypeTag(0x0f))
        ));
        assert!(matches!(
            Value::from_hex("0x0303"),
            Err(Error::TrailingBytes)
        ));
        assert!(matches!(Value::from_hex("0xzz"), Err(Error::InvalidHex(_))));
    }
}
