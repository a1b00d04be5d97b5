//! Binary encoding for embeddings.
//!
//! Embeddings are stored as an opaque binary column: 4-byte little-endian
//! f32 per component. The round trip is exact for f32 values.

use crate::error::{Result, RetrievalError};

/// Serialize an embedding to little-endian f32 bytes.
pub fn serialize_embedding(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for value in embedding {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Deserialize little-endian f32 bytes back into an embedding.
///
/// # Errors
///
/// Returns [`RetrievalError::Encoding`] if the byte length is not a
/// multiple of 4.
pub fn deserialize_embedding(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(RetrievalError::Encoding(format!(
            "embedding byte length {} is not a multiple of 4",
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_exact() {
        let embedding = vec![0.12345_f32, -0.98765, 1.0, 0.0, -1.0, 3.14159];
        let decoded = deserialize_embedding(&serialize_embedding(&embedding)).unwrap();
        assert_eq!(decoded, embedding);
    }

    #[test]
    fn round_trip_preserves_five_decimal_places() {
        let embedding: Vec<f32> = (0..1536).map(|i| (i as f32) * 0.00071 - 0.5).collect();
        let decoded = deserialize_embedding(&serialize_embedding(&embedding)).unwrap();

        assert_eq!(decoded.len(), embedding.len());
        for (original, restored) in embedding.iter().zip(&decoded) {
            assert!((original - restored).abs() < 1e-5);
        }
    }

    #[test]
    fn empty_embedding_round_trips() {
        assert_eq!(deserialize_embedding(&serialize_embedding(&[])).unwrap(), Vec::<f32>::new());
    }

    #[test]
    fn truncated_bytes_are_rejected() {
        let mut bytes = serialize_embedding(&[1.0, 2.0]);
        bytes.pop();
        let err = deserialize_embedding(&bytes).unwrap_err();
        assert!(matches!(err, RetrievalError::Encoding(_)));
    }
}
