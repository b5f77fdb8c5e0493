//! LZ-string-style dictionary codec (spec.md §4.8), grounded verbatim on
//! `original_source/utils/lz_string.go`. Emits/reads 6-bit code units
//! packed over a caller-supplied 64-character alphabet.

use std::collections::{HashMap, HashSet};

const BITS_PER_CHAR: u32 = 6;
pub const RESET_VALUE: u32 = 32;

pub const BASE64_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
pub const URI_SAFE_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+-$";
pub const CLOUDFLARE_ALPHABET: &str =
    "Mz8g3qloHTIEuWaYsw9j56Sc47Dpbx0GJ-kO2AvfyQLnirmFeRtC$K+PUdh1VXZBN";

struct BitWriter {
    alphabet: Vec<char>,
    data: String,
    val: u32,
    position: u32,
}

impl BitWriter {
    fn new(alphabet: &str) -> Self {
        BitWriter {
            alphabet: alphabet.chars().collect(),
            data: String::new(),
            val: 0,
            position: 0,
        }
    }

    fn write_bits(&mut self, mut value: u32, count: u32) {
        for _ in 0..count {
            self.val = (self.val << 1) | (value & 1);
            if self.position == BITS_PER_CHAR - 1 {
                self.position = 0;
                self.data.push(self.alphabet[self.val as usize]);
                self.val = 0;
            } else {
                self.position += 1;
            }
            value >>= 1;
        }
    }

    fn finish(mut self) -> String {
        loop {
            self.val <<= 1;
            if self.position == BITS_PER_CHAR - 1 {
                self.data.push(self.alphabet[self.val as usize]);
                break;
            } else {
                self.position += 1;
            }
        }
        self.data
    }
}

/// Emits a dictionary-coded literal-or-backreference for `w`, then
/// applies the standard enlarge/numBits growth step.
fn emit(
    writer: &mut BitWriter,
    w: &str,
    dictionary: &HashMap<String, u32>,
    dictionary_to_create: &mut HashSet<String>,
    enlarge_in: &mut u32,
    num_bits: &mut u32,
) {
    if dictionary_to_create.contains(w) {
        let first = w.chars().next().expect("w is never empty here") as u32;
        if first < 256 {
            writer.write_bits(0, *num_bits);
            writer.write_bits(first, 8);
        } else {
            writer.write_bits(1, *num_bits);
            writer.write_bits(first, 16);
        }
        dictionary_to_create.remove(w);
    } else {
        writer.write_bits(dictionary[w], *num_bits);
    }
    *enlarge_in -= 1;
    if *enlarge_in == 0 {
        *enlarge_in = 1 << *num_bits;
        *num_bits += 1;
    }
}

/// Compresses `input` into the code-unit string over `alphabet` (no
/// base64 padding — see [`compress_to_base64`] for that).
pub fn compress(alphabet: &str, input: &str) -> String {
    let mut dictionary: HashMap<String, u32> = HashMap::new();
    let mut dictionary_to_create: HashSet<String> = HashSet::new();
    let mut w = String::new();
    let mut enlarge_in: u32 = 2;
    let mut dict_size: u32 = 3;
    let mut num_bits: u32 = 2;
    let mut writer = BitWriter::new(alphabet);

    for ch in input.chars() {
        let c = ch.to_string();
        if !dictionary.contains_key(&c) {
            dictionary.insert(c.clone(), dict_size);
            dict_size += 1;
            dictionary_to_create.insert(c.clone());
        }
        let wc = format!("{w}{c}");
        if dictionary.contains_key(&wc) {
            w = wc;
        } else {
            emit(
                &mut writer,
                &w,
                &dictionary,
                &mut dictionary_to_create,
                &mut enlarge_in,
                &mut num_bits,
            );
            dictionary.insert(wc, dict_size);
            dict_size += 1;
            w = c;
        }
    }

    if !w.is_empty() {
        emit(
            &mut writer,
            &w,
            &dictionary,
            &mut dictionary_to_create,
            &mut enlarge_in,
            &mut num_bits,
        );
    }

    writer.write_bits(2, num_bits);
    writer.finish()
}

/// Pads to a length that is a multiple of 4, the way base64 output is
/// conventionally padded.
fn pad_base64(mut s: String) -> String {
    match s.len() % 4 {
        1 => s.push_str("==="),
        2 => s.push_str("=="),
        3 => s.push('='),
        _ => {}
    }
    s
}

pub fn compress_to_base64(input: &str) -> String {
    pad_base64(compress(BASE64_ALPHABET, input))
}

struct BitReader<'a> {
    chars: &'a [char],
    index_of: HashMap<char, u32>,
    reset_value: u32,
    data_val: u32,
    data_position: u32,
    data_index: usize,
}

impl<'a> BitReader<'a> {
    fn new(alphabet: &str, chars: &'a [char], reset_value: u32) -> Self {
        let index_of: HashMap<char, u32> = alphabet.chars().enumerate().map(|(i, c)| (c, i as u32)).collect();
        let data_val = chars.first().and_then(|c| index_of.get(c)).copied().unwrap_or(0);
        BitReader {
            chars,
            index_of,
            reset_value,
            data_val,
            data_position: reset_value,
            data_index: 1,
        }
    }

    fn next_value(&mut self) -> u32 {
        let v = self
            .chars
            .get(self.data_index)
            .and_then(|c| self.index_of.get(c))
            .copied()
            .unwrap_or(0);
        self.data_index += 1;
        v
    }

    fn read_bits(&mut self, count: u32) -> u32 {
        let mut bits = 0u32;
        for power in 0..count {
            let resb = self.data_val & self.data_position;
            self.data_position >>= 1;
            if self.data_position == 0 {
                self.data_position = self.reset_value;
                self.data_val = self.next_value();
            }
            if resb != 0 {
                bits |= 1 << power;
            }
        }
        bits
    }
}

fn char_from_code(code: u32) -> String {
    char::from_u32(code).unwrap_or('\u{fffd}').to_string()
}

/// Generic decompressor: every named variant below is this function with
/// a fixed alphabet/reset value (spec.md §4.8's "implementations must
/// parameterize the alphabet and reset value").
pub fn decompress(alphabet: &str, reset_value: u32, compressed: &str) -> String {
    if compressed.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = compressed.chars().collect();
    let mut reader = BitReader::new(alphabet, &chars, reset_value);

    let kind = reader.read_bits(2);
    let first = match kind {
        0 => char_from_code(reader.read_bits(8)),
        1 => char_from_code(reader.read_bits(16)),
        _ => return String::new(),
    };

    let mut dictionary: HashMap<u32, String> = HashMap::new();
    dictionary.insert(3, first.clone());
    let mut dict_size: u32 = 4;
    let mut enlarge_in: u32 = 4;
    let mut num_bits: u32 = 3;
    let mut w = first.clone();
    let mut result = first;

    loop {
        let code = reader.read_bits(num_bits);
        let mut cc = code;
        match code {
            0 => {
                let c = char_from_code(reader.read_bits(8));
                dictionary.insert(dict_size, c);
                cc = dict_size;
                dict_size += 1;
                enlarge_in -= 1;
            }
            1 => {
                let c = char_from_code(reader.read_bits(16));
                dictionary.insert(dict_size, c);
                cc = dict_size;
                dict_size += 1;
                enlarge_in -= 1;
            }
            2 => return result,
            _ => {}
        }

        if enlarge_in == 0 {
            enlarge_in = 1 << num_bits;
            num_bits += 1;
        }

        let entry = if let Some(e) = dictionary.get(&cc) {
            e.clone()
        } else if cc == dict_size {
            format!("{w}{}", w.chars().next().unwrap_or_default())
        } else {
            return result;
        };

        result.push_str(&entry);

        let first_char = entry.chars().next().unwrap_or_default();
        dictionary.insert(dict_size, format!("{w}{first_char}"));
        dict_size += 1;
        enlarge_in -= 1;

        w = entry;

        if enlarge_in == 0 {
            enlarge_in = 1 << num_bits;
            num_bits += 1;
        }
    }
}

pub fn decompress_from_base64(compressed: &str) -> String {
    let trimmed = compressed.trim_end_matches('=');
    decompress(BASE64_ALPHABET, RESET_VALUE, trimmed)
}

pub fn decompress_from_encoded_uri_component(compressed: &str) -> String {
    let normalized = compressed.replace(' ', "+");
    decompress(URI_SAFE_ALPHABET, RESET_VALUE, &normalized)
}

pub fn decompress_from_cloudflare(compressed: &str) -> String {
    decompress(CLOUDFLARE_ALPHABET, RESET_VALUE, compressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_aaaa_and_pads_to_multiple_of_four() {
        let compressed = compress_to_base64("AAAA");
        assert_eq!(compressed.len() % 4, 0);
        assert_eq!(decompress_from_base64(&compressed), "AAAA");
    }

    #[test]
    fn round_trips_arbitrary_utf8() {
        let input = "hello, world! 🎉 hello again, world";
        let compressed = compress(BASE64_ALPHABET, input);
        assert_eq!(decompress(BASE64_ALPHABET, RESET_VALUE, &compressed), input);
    }

    #[test]
    fn empty_input_round_trips() {
        let compressed = compress_to_base64("");
        assert_eq!(decompress_from_base64(&compressed), "");
    }

    #[test]
    fn cloudflare_decoder_handles_empty_string() {
        assert_eq!(decompress_from_cloudflare(""), "");
    }

    #[test]
    fn cloudflare_decoder_round_trips_compressed_output() {
        let compressed = compress(CLOUDFLARE_ALPHABET, "hello cloudflare");
        assert_eq!(
            decompress(CLOUDFLARE_ALPHABET, RESET_VALUE, &compressed),
            "hello cloudflare"
        );
    }

    #[test]
    fn round_trip_holds_for_any_distinct_64_char_alphabet() {
        let alphabet = "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ!@";
        for sample in ["", "x", "aaaaaaaaaa", "the quick brown fox jumps"] {
            let compressed = compress(alphabet, sample);
            assert_eq!(decompress(alphabet, RESET_VALUE, &compressed), sample);
        }
    }
}
