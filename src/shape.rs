//! Coarse character-class signatures.
//!
//! Uppercase ASCII letters become `A`, lowercase `a`, digits `9` and every
//! other character `x`. The mapping is per character, so the pattern always
//! has as many characters as its input.

pub fn shape_pattern(value: &str) -> String {
    value.chars().map(shape_of).collect()
}

fn shape_of(ch: char) -> char {
    match ch {
        'A'..='Z' => 'A',
        'a'..='z' => 'a',
        '0'..='9' => '9',
        _ => 'x',
    }
}
