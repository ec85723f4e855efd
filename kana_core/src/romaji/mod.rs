//! Romanization of kana display text into typeable candidate paths.

mod table;

use kana_schema::{Note, Syllable};

use self::table::{HATSUON, SMALL_TSU, SOKUON};

enum Token {
    Kana { kana: String, paths: Vec<String> },
    Sokuon,
    Hatsuon,
}

/// Folds katakana onto hiragana and full-width ASCII onto ASCII.
pub fn normalize(c: char) -> char {
    let folded = match c {
        '\u{30A1}'..='\u{30F6}' => char::from_u32(c as u32 - 0x60),
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0),
        _ => None,
    };
    folded.unwrap_or(c)
}

/// Returns the note's precomputed syllables, or derives them from its text when none were given.
pub fn resolve_note(note: &Note) -> Vec<Syllable> {
    if note.syllables.is_empty() {
        syllabify(&note.text)
    } else {
        note.syllables.clone()
    }
}

/// Every full way of typing `kana`, in preference order.
///
/// Intended for short units (one syllable or a handful); the result is the product of the
/// per-syllable candidate sets.
pub fn candidates(kana: &str) -> Vec<String> {
    let syllables = syllabify(kana);
    if syllables.is_empty() {
        return Vec::new();
    }

    let mut paths = vec![String::new()];
    for syllable in &syllables {
        let mut next = Vec::with_capacity(paths.len() * syllable.romaji.len());
        for head in &paths {
            for tail in &syllable.romaji {
                next.push(format!("{head}{tail}"));
            }
        }
        paths = next;
    }
    dedup(paths)
}

/// Splits display text into syllables with their candidate romanizations.
///
/// Unknown graphemes (e.g. kanji) become syllables with no candidates, which can never be typed.
pub fn syllabify(text: &str) -> Vec<Syllable> {
    let mut reversed: Vec<Syllable> = Vec::new();

    for token in tokenize(text).into_iter().rev() {
        let syllable = match token {
            Token::Kana { kana, paths } => Syllable { kana, romaji: paths },
            Token::Hatsuon => Syllable::new(HATSUON.to_string(), hatsuon_paths(reversed.last())),
            Token::Sokuon => {
                let merged = reversed.last().and_then(geminate);
                match merged {
                    Some(merged) => {
                        reversed.pop();
                        merged
                    }
                    None => Syllable::new(SOKUON.to_string(), SMALL_TSU.iter().copied()),
                }
            }
        };
        reversed.push(syllable);
    }

    reversed.reverse();
    reversed
}

fn tokenize(text: &str) -> Vec<Token> {
    let chars: Vec<char> = text.chars().map(normalize).collect();
    let mut tokens = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == SOKUON {
            tokens.push(Token::Sokuon);
            i += 1;
            continue;
        }
        if c == HATSUON {
            tokens.push(Token::Hatsuon);
            i += 1;
            continue;
        }

        if let Some(&next) = chars.get(i + 1) {
            let pair: String = [c, next].iter().collect();
            if let Some(paths) = table::digraph(&pair) {
                let mut all: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
                for head in single_paths(c) {
                    for tail in single_paths(next) {
                        all.push(format!("{head}{tail}"));
                    }
                }
                tokens.push(Token::Kana {
                    kana: pair,
                    paths: dedup(all),
                });
                i += 2;
                continue;
            }
        }

        tokens.push(Token::Kana {
            kana: c.to_string(),
            paths: single_paths(c),
        });
        i += 1;
    }

    tokens
}

fn single_paths(c: char) -> Vec<String> {
    if c.is_ascii_graphic() || c == ' ' {
        return vec![c.to_ascii_lowercase().to_string()];
    }
    table::single(c)
        .map(|paths| paths.iter().map(|p| p.to_string()).collect())
        .unwrap_or_default()
}

/// `ん` may be a lone `n` only when nothing after it could read as `n?`.
fn hatsuon_paths(next: Option<&Syllable>) -> Vec<&'static str> {
    let lone_n = next.is_some_and(|syllable| {
        !syllable.romaji.is_empty()
            && syllable.romaji.iter().all(|path| {
                path.chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_lowercase() && !"aiueony".contains(c))
            })
    });

    if lone_n {
        vec!["n", "nn", "xn"]
    } else {
        vec!["nn", "xn"]
    }
}

/// Merges `っ` into the following syllable. `None` when no path can double its consonant.
fn geminate(next: &Syllable) -> Option<Syllable> {
    let mut paths: Vec<String> = next
        .romaji
        .iter()
        .filter_map(|path| {
            let first = path.chars().next()?;
            let doubles = first.is_ascii_lowercase() && !"aiueon".contains(first);
            doubles.then(|| format!("{first}{path}"))
        })
        .collect();

    if paths.is_empty() {
        return None;
    }

    for prefix in SMALL_TSU {
        for path in &next.romaji {
            paths.push(format!("{prefix}{path}"));
        }
    }

    Some(Syllable {
        kana: format!("{SOKUON}{}", next.kana),
        romaji: dedup(paths),
    })
}

fn dedup(paths: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(paths.len());
    for path in paths {
        if !out.contains(&path) {
            out.push(path);
        }
    }
    out
}
