//! Response body decoding: Brotli passthrough and base64 projection.

use std::io::Read;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use brotli::Decompressor;

const BROTLI_BUFFER_SIZE: usize = 4096;

/// Decompress a Brotli-encoded body.
///
/// Contract: on any decompression failure the input is returned unchanged.
/// Callers never observe an error from this path.
pub fn decompress_brotli(input: &[u8]) -> Vec<u8> {
    match try_decompress(input) {
        Ok(output) => output,
        Err(err) => {
            tracing::debug!(error = %err, "Brotli decompression failed, passing body through");
            input.to_vec()
        }
    }
}

fn try_decompress(input: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut output = Vec::new();
    Decompressor::new(input, BROTLI_BUFFER_SIZE).read_to_end(&mut output)?;
    Ok(output)
}

/// URL-safe base64 of the UTF-8 bytes of `text`.
pub fn encode_base64(text: &str) -> String {
    URL_SAFE.encode(text.as_bytes())
}
