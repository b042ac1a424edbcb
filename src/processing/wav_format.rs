/// WAV file format utilities.
///
/// Generates canonical 44-byte RIFF WAV headers. The size fields are
/// written as placeholders at open time and patched in place once the
/// payload size is known.
/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// Byte offset of the RIFF chunk size field (`36 + data_size`).
pub const RIFF_SIZE_OFFSET: u64 = 4;

/// Byte offset of the data chunk size field.
pub const DATA_SIZE_OFFSET: u64 = 40;

/// Generate a 44-byte WAV RIFF header.
///
/// Format: PCM (format code 1), little-endian regardless of host order.
///
/// Layout:
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    36 + data_size
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (PCM format chunk size)
/// [20-21]  1 (PCM format code)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte_rate = sample_rate * channels * bits_per_sample / 8
/// [32-33]  block_align = channels * bits_per_sample / 8
/// [34-35]  bits_per_sample
/// [36-39]  "data"
/// [40-43]  data_size
/// ```
pub fn generate_wav_header(
    sample_rate: u32,
    bits_per_sample: u16,
    channels: u16,
    data_size: u32,
) -> [u8; WAV_HEADER_SIZE] {
    let byte_rate = sample_rate * channels as u32 * bits_per_sample as u32 / 8;
    let block_align = channels * bits_per_sample / 8;
    let chunk_size = riff_chunk_size(data_size);

    let mut header = [0u8; WAV_HEADER_SIZE];

    // RIFF chunk descriptor
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&chunk_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    // fmt sub-chunk
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes()); // PCM format size
    header[20..22].copy_from_slice(&1u16.to_le_bytes()); // PCM format code
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&bits_per_sample.to_le_bytes());

    // data sub-chunk
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    header
}

/// Generate the provisional header written at open time.
///
/// Both the RIFF chunk size (offset 4) and the data chunk size (offset
/// 40) are zero placeholders until finalize patches in the true sizes.
pub fn provisional_wav_header(
    sample_rate: u32,
    bits_per_sample: u16,
    channels: u16,
) -> [u8; WAV_HEADER_SIZE] {
    let mut header = generate_wav_header(sample_rate, bits_per_sample, channels, 0);
    header[4..8].copy_from_slice(&0u32.to_le_bytes());
    header
}

/// RIFF chunk size for a given payload: everything after the first 8
/// header bytes.
pub fn riff_chunk_size(data_size: u32) -> u32 {
    36 + data_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_size_is_44_bytes() {
        let header = generate_wav_header(44100, 16, 1, 0);
        assert_eq!(header.len(), 44);
    }

    #[test]
    fn header_riff_magic() {
        let header = generate_wav_header(44100, 16, 1, 0);
        assert_eq!(&header[0..4], b"RIFF");
        assert_eq!(&header[8..12], b"WAVE");
        assert_eq!(&header[12..16], b"fmt ");
        assert_eq!(&header[36..40], b"data");
    }

    #[test]
    fn header_pcm_format() {
        let header = generate_wav_header(44100, 16, 1, 0);
        // Format code = 1 (PCM)
        assert_eq!(u16::from_le_bytes([header[20], header[21]]), 1);
        // fmt chunk size = 16
        assert_eq!(u32::from_le_bytes([header[16], header[17], header[18], header[19]]), 16);
    }

    #[test]
    fn provisional_header_has_zero_sizes() {
        let header = provisional_wav_header(44100, 16, 1);
        assert_eq!(u32::from_le_bytes([header[4], header[5], header[6], header[7]]), 0);
        assert_eq!(u32::from_le_bytes([header[40], header[41], header[42], header[43]]), 0);
    }

    #[test]
    fn provisional_header_keeps_format_fields() {
        let header = provisional_wav_header(44100, 16, 1);
        assert_eq!(&header[0..4], b"RIFF");
        assert_eq!(&header[8..12], b"WAVE");
        assert_eq!(u16::from_le_bytes([header[22], header[23]]), 1);
        assert_eq!(u32::from_le_bytes([header[24], header[25], header[26], header[27]]), 44100);
        assert_eq!(u16::from_le_bytes([header[34], header[35]]), 16);
    }

    #[test]
    fn header_44khz_mono_16bit() {
        let header = generate_wav_header(44100, 16, 1, 9600);

        let channels = u16::from_le_bytes([header[22], header[23]]);
        assert_eq!(channels, 1);

        let sample_rate = u32::from_le_bytes([header[24], header[25], header[26], header[27]]);
        assert_eq!(sample_rate, 44100);

        let byte_rate = u32::from_le_bytes([header[28], header[29], header[30], header[31]]);
        assert_eq!(byte_rate, 88200); // 44100 * 1 * 16/8

        let block_align = u16::from_le_bytes([header[32], header[33]]);
        assert_eq!(block_align, 2); // 1 * 16/8

        let bits_per_sample = u16::from_le_bytes([header[34], header[35]]);
        assert_eq!(bits_per_sample, 16);

        let data_size = u32::from_le_bytes([header[40], header[41], header[42], header[43]]);
        assert_eq!(data_size, 9600);

        let chunk_size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        assert_eq!(chunk_size, 36 + 9600);
    }

    #[test]
    fn header_8khz_stereo_8bit() {
        let header = generate_wav_header(8000, 8, 2, 0);

        let byte_rate = u32::from_le_bytes([header[28], header[29], header[30], header[31]]);
        assert_eq!(byte_rate, 16000); // 8000 * 2 * 8/8

        let block_align = u16::from_le_bytes([header[32], header[33]]);
        assert_eq!(block_align, 2);
    }
}
