use std::sync::LazyLock;

use regex::Regex;

static CHANNEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("channel pattern"));

/// First three integers found in `value`, e.g. the channels of
/// `rgb(255, 0, 0)`.
fn channels(value: &str) -> Option<[u32; 3]> {
    let mut found = CHANNEL
        .find_iter(value)
        .map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX));
    Some([found.next()?, found.next()?, found.next()?])
}

/// `rgb(255, 0, 0)` becomes `#FF0000`. Input without three channels is
/// returned unchanged.
pub fn rgb_to_hex(value: &str) -> String {
    let Some([r, g, b]) = channels(value) else {
        return value.to_string();
    };
    let packed = (1u64 << 24) + (u64::from(r) << 16) + (u64::from(g) << 8) + u64::from(b);
    format!("#{}", &format!("{packed:X}")[1..])
}

/// `rgb(255, 0, 0)` becomes `hsl(0, 100.0%, 50.0%)`.
pub fn rgb_to_hsl(value: &str) -> String {
    let Some(rgb) = channels(value) else {
        return value.to_string();
    };
    let [r, g, b] = rgb.map(|c| f64::from(c) / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    let (h, s) = if max == min {
        (0.0, 0.0)
    } else {
        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        ((h * 60.0).round(), s)
    };

    format!("hsl({h}, {:.1}%, {:.1}%)", s * 100.0, l * 100.0)
}

#[cfg(test)]
#[path = "tests/color_tests.rs"]
mod tests;
