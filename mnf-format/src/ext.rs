//! Pure payload-prefix → extension mapping.
//!
//! Priority-ordered: the shortest prefixes are checked first, but a match at
//! any length wins outright. Payloads shorter than a given chunk length are
//! compared against the whole payload instead of a truncated prefix.

/// Map the leading bytes of a decompressed payload to a canonical extension.
///
/// Falls back to `"dat"` when nothing matches.
#[must_use]
pub fn sniff_extension(data: &[u8]) -> &'static str {
    let two = chunk_start(data, 2);
    match two {
        [0xe5, 0x9b] => return "gr2",
        [0x1e, 0x0d] => return "hkt",
        _ => {}
    }

    let three = chunk_start(data, 3);
    if three == b"DDS" {
        return "dds";
    }
    if three == b"XRF" {
        return "xref";
    }

    let four = chunk_start(data, 4);
    match four {
        b"ANFT" => return "anft",
        b"BKHD" => return "bnk",
        [0xfa, 0xfa, 0xeb, 0xeb] => return "db",
        [0xfb, 0xfb, 0xec, 0xec] => return "index",
        [0x1b, 0x4c, 0x75, 0x61] => return "luac",
        [0x89, 0x50, 0x4e, 0x47] => return "png",
        b"PSB2" => return "psb",
        b"RIFF" => return "wem",
        _ => {}
    }

    let five = chunk_start(data, 5);
    if five == b"ZOSFT" {
        return "zosft";
    }

    let eight = chunk_start(data, 8);
    if eight == [0x5f, 0x5f, 0x66, 0x66, 0x78, 0x00, 0x00, 0x01] {
        return "ffxactor";
    }
    if eight == [0x5f, 0x5f, 0x66, 0x66, 0x78, 0x00, 0x00, 0x02] {
        return "ffxbones";
    }

    "dat"
}

fn chunk_start(data: &[u8], len: usize) -> &[u8] {
    if len < data.len() { &data[..len] } else { data }
}
