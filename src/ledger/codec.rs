//! Canonical binary encoding for transactions.
//!
//! Every field is written as a varint key `(field_number << 3) | wire_type`
//! followed by its value. Integers use wire type 0 (varint); bytes and strings
//! use wire type 2 (varint length prefix). Fields are written in ascending
//! field-number order and are always present, even when empty. Repeated bytes
//! are written one key per element, so empty signature placeholders still
//! occupy their position.

use thiserror::Error;

use crate::ledger::address::Address;

const WIRE_VARINT: u32 = 0;
const WIRE_LENGTH_DELIMITED: u32 = 2;

/// Errors raised while decoding a canonical payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("varint exceeds 64 bits")]
    VarintOverflow,

    #[error("expected field {expected}, found field {found}")]
    UnexpectedField { expected: u32, found: u32 },

    #[error("field {field} has wire type {wire_type}, expected {expected}")]
    WireTypeMismatch { field: u32, wire_type: u32, expected: u32 },

    #[error("field {0} is not valid UTF-8")]
    InvalidUtf8(u32),

    #[error("{0} trailing bytes after payload")]
    TrailingBytes(usize),

    #[error("invalid recipient address: {0}")]
    InvalidAddress(String),
}

/// Sequential writer for canonical payloads.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_uint64(&mut self, field: u32, value: u64) {
        self.write_key(field, WIRE_VARINT);
        write_varint(&mut self.buf, value);
    }

    pub fn write_bytes(&mut self, field: u32, value: &[u8]) {
        self.write_key(field, WIRE_LENGTH_DELIMITED);
        write_varint(&mut self.buf, value.len() as u64);
        self.buf.extend_from_slice(value);
    }

    pub fn write_string(&mut self, field: u32, value: &str) {
        self.write_bytes(field, value.as_bytes());
    }

    pub fn write_bytes_array(&mut self, field: u32, items: &[Vec<u8>]) {
        for item in items {
            self.write_bytes(field, item);
        }
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    fn write_key(&mut self, field: u32, wire_type: u32) {
        write_varint(&mut self.buf, u64::from((field << 3) | wire_type));
    }
}

fn write_varint(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Sequential reader mirroring [`Writer`].
#[derive(Debug)]
pub struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn read_uint64(&mut self, field: u32) -> Result<u64, CodecError> {
        self.expect_key(field, WIRE_VARINT)?;
        self.read_varint()
    }

    pub fn read_bytes(&mut self, field: u32) -> Result<Vec<u8>, CodecError> {
        self.expect_key(field, WIRE_LENGTH_DELIMITED)?;
        let len = self.read_varint()? as usize;
        let end = self.pos.checked_add(len).ok_or(CodecError::UnexpectedEof)?;
        let slice = self.input.get(self.pos..end).ok_or(CodecError::UnexpectedEof)?;
        self.pos = end;
        Ok(slice.to_vec())
    }

    pub fn read_string(&mut self, field: u32) -> Result<String, CodecError> {
        String::from_utf8(self.read_bytes(field)?).map_err(|_| CodecError::InvalidUtf8(field))
    }

    /// Read every remaining occurrence of a repeated bytes field.
    pub fn read_bytes_array(&mut self, field: u32) -> Result<Vec<Vec<u8>>, CodecError> {
        let mut items = Vec::new();
        while !self.is_empty() {
            items.push(self.read_bytes(field)?);
        }
        Ok(items)
    }

    pub fn finish(self) -> Result<(), CodecError> {
        match self.input.len().saturating_sub(self.pos) {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n)),
        }
    }

    fn expect_key(&mut self, field: u32, expected: u32) -> Result<(), CodecError> {
        let key = self.read_varint()?;
        let found = (key >> 3) as u32;
        let wire_type = (key & 0x7) as u32;
        if found != field {
            return Err(CodecError::UnexpectedField { expected: field, found });
        }
        if wire_type != expected {
            return Err(CodecError::WireTypeMismatch { field, wire_type, expected });
        }
        Ok(())
    }

    fn read_varint(&mut self) -> Result<u64, CodecError> {
        let mut value: u64 = 0;
        for shift in (0..64).step_by(7) {
            let byte = *self.input.get(self.pos).ok_or(CodecError::UnexpectedEof)?;
            self.pos += 1;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(CodecError::VarintOverflow)
    }
}

/// Parameters of a `token:transfer` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferParams {
    pub token_id: Vec<u8>,
    pub amount: u64,
    pub recipient_address: Address,
    pub data: String,
}

impl TransferParams {
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = Writer::new();
        writer.write_bytes(1, &self.token_id);
        writer.write_uint64(2, self.amount);
        writer.write_bytes(3, self.recipient_address.as_bytes());
        writer.write_string(4, &self.data);
        writer.finish()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut reader = Reader::new(bytes);
        let token_id = reader.read_bytes(1)?;
        let amount = reader.read_uint64(2)?;
        let recipient = reader.read_bytes(3)?;
        let data = reader.read_string(4)?;
        reader.finish()?;

        let recipient_address =
            Address::from_bytes(&recipient).map_err(|e| CodecError::InvalidAddress(e.to_string()))?;
        Ok(Self { token_id, amount, recipient_address, data })
    }
}

/// A complete transaction in its canonical field layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPayload {
    pub module: String,
    pub command: String,
    pub nonce: u64,
    pub fee: u64,
    pub sender_public_key: Vec<u8>,
    pub params: Vec<u8>,
    pub signatures: Vec<Vec<u8>>,
}

impl TransactionPayload {
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = Writer::new();
        writer.write_string(1, &self.module);
        writer.write_string(2, &self.command);
        writer.write_uint64(3, self.nonce);
        writer.write_uint64(4, self.fee);
        writer.write_bytes(5, &self.sender_public_key);
        writer.write_bytes(6, &self.params);
        writer.write_bytes_array(7, &self.signatures);
        writer.finish()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut reader = Reader::new(bytes);
        let payload = Self {
            module: reader.read_string(1)?,
            command: reader.read_string(2)?,
            nonce: reader.read_uint64(3)?,
            fee: reader.read_uint64(4)?,
            sender_public_key: reader.read_bytes(5)?,
            params: reader.read_bytes(6)?,
            signatures: reader.read_bytes_array(7)?,
        };
        reader.finish()?;
        Ok(payload)
    }

    /// Decode `params` as transfer parameters.
    pub fn transfer_params(&self) -> Result<TransferParams, CodecError> {
        TransferParams::decode(&self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint_encoding() {
        let mut buf = Vec::new();
        write_varint(&mut buf, 1);
        write_varint(&mut buf, 300);
        write_varint(&mut buf, u64::MAX);
        assert_eq!(&buf[..3], &[0x01, 0xac, 0x02]);
        assert_eq!(buf.len(), 3 + 10);
    }

    #[test]
    fn test_field_keys_and_lengths() {
        let mut writer = Writer::new();
        writer.write_uint64(3, 5);
        writer.write_string(1, "token");
        assert_eq!(
            writer.finish(),
            vec![0x18, 0x05, 0x0a, 0x05, b't', b'o', b'k', b'e', b'n']
        );
    }

    #[test]
    fn test_empty_array_elements_keep_their_slot() {
        let mut writer = Writer::new();
        writer.write_bytes_array(7, &[vec![0xaa], Vec::new(), vec![0xbb]]);
        let bytes = writer.finish();
        assert_eq!(bytes, vec![0x3a, 0x01, 0xaa, 0x3a, 0x00, 0x3a, 0x01, 0xbb]);

        let mut reader = Reader::new(&bytes);
        let items = reader.read_bytes_array(7).unwrap();
        assert_eq!(items, vec![vec![0xaa], Vec::new(), vec![0xbb]]);
    }

    #[test]
    fn test_transaction_payload_layout() {
        let recipient = Address::from_public_key(&[9u8; 32]);
        let params = TransferParams {
            token_id: vec![0, 0, 0, 0, 0, 0, 0, 0],
            amount: 1_000,
            recipient_address: recipient,
            data: "hello".to_string(),
        };
        let payload = TransactionPayload {
            module: "token".to_string(),
            command: "transfer".to_string(),
            nonce: 7,
            fee: 100_000,
            sender_public_key: vec![1u8; 32],
            params: params.encode(),
            signatures: vec![vec![2u8; 64], Vec::new()],
        };

        let bytes = payload.encode();
        assert_eq!(&bytes[..2], &[0x0a, 0x05]);

        let decoded = TransactionPayload::decode(&bytes).unwrap();
        assert_eq!(decoded, payload);
        assert_eq!(decoded.transfer_params().unwrap(), params);
    }

    #[test]
    fn test_decode_rejects_out_of_order_fields() {
        let mut writer = Writer::new();
        writer.write_string(2, "transfer");
        let err = TransactionPayload::decode(&writer.finish()).unwrap_err();
        assert_eq!(err, CodecError::UnexpectedField { expected: 1, found: 2 });
    }

    #[test]
    fn test_decode_rejects_truncated_input() {
        let err = TransferParams::decode(&[0x0a, 0x08, 0x00]).unwrap_err();
        assert_eq!(err, CodecError::UnexpectedEof);
    }
}
