use kana_schema::Syllable;

/// Typing progress through one note's syllables.
///
/// Every reading still consistent with the typed characters is kept as a branch, so a syllable
/// boundary is never fixed before the input forces it (`n` + `na` and `nn` + `a...` both stay alive
/// after `nn`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteProgress {
    branches: Vec<Branch>,
    /// Everything typed for this note so far.
    typed: String,
}

/// One live reading: the syllable being typed and what was typed into it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Branch {
    syllable: usize,
    typed: String,
}

impl Branch {
    fn start(syllable: usize) -> Self {
        Self {
            syllable,
            typed: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Consume {
    pub accepted: bool,
    pub completed: bool,
}

impl Default for NoteProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteProgress {
    pub fn new() -> Self {
        Self {
            branches: vec![Branch::start(0)],
            typed: String::new(),
        }
    }

    pub fn typed_prefix(&self) -> &str {
        &self.typed
    }

    /// The earliest syllable any live reading is still in.
    pub fn current_syllable(&self) -> usize {
        self.branches.iter().map(|b| b.syllable).min().unwrap_or(0)
    }

    pub fn is_complete(&self, syllables: &[Syllable]) -> bool {
        self.branches.iter().any(|b| {
            b.syllable + 1 == syllables.len()
                && fully_matches(&syllables[b.syllable].romaji, &b.typed)
        })
    }

    /// Paths of the current syllable still consistent with what was typed into it.
    pub fn candidate_paths<'a>(&self, syllables: &'a [Syllable]) -> Vec<&'a str> {
        let current = self.current_syllable();
        let Some(syllable) = syllables.get(current) else {
            return Vec::new();
        };

        let mut paths: Vec<&str> = Vec::new();
        for branch in self.branches.iter().filter(|b| b.syllable == current) {
            for path in &syllable.romaji {
                if path.starts_with(branch.typed.as_str()) && !paths.contains(&path.as_str()) {
                    paths.push(path);
                }
            }
        }
        paths
    }

    /// Whether `c` would be accepted, without consuming it.
    pub fn accepts(&self, syllables: &[Syllable], c: char) -> bool {
        self.branches
            .iter()
            .flat_map(|b| openings(b, syllables))
            .any(|b| extends(&syllables[b.syllable].romaji, &b.typed, c))
    }

    pub fn try_consume(&mut self, syllables: &[Syllable], c: char) -> Consume {
        let mut next: Vec<Branch> = Vec::new();
        for branch in self.branches.iter().flat_map(|b| openings(b, syllables)) {
            if !extends(&syllables[branch.syllable].romaji, &branch.typed, c) {
                continue;
            }
            let mut grown = branch;
            grown.typed.push(c);
            let grown = settle(grown, syllables);
            if !next.contains(&grown) {
                next.push(grown);
            }
        }

        if next.is_empty() {
            return Consume::default();
        }
        self.branches = next;
        self.typed.push(c);

        Consume {
            accepted: true,
            completed: self.is_complete(syllables),
        }
    }

    /// What is left to type along the shortest live reading, taking each remaining syllable's
    /// first consistent path.
    pub fn remaining_romaji(&self, syllables: &[Syllable]) -> String {
        self.branches
            .iter()
            .map(|b| remaining_for(b, syllables))
            .min_by_key(String::len)
            .unwrap_or_default()
    }
}

/// The branch itself plus, once its syllable is fully typed, the start of the following one.
fn openings(branch: &Branch, syllables: &[Syllable]) -> Vec<Branch> {
    let mut out = Vec::with_capacity(2);
    let Some(current) = syllables.get(branch.syllable) else {
        return out;
    };
    out.push(branch.clone());
    if branch.syllable + 1 < syllables.len() && fully_matches(&current.romaji, &branch.typed) {
        out.push(Branch::start(branch.syllable + 1));
    }
    out
}

// A fully typed syllable that no longer path can extend moves on to the next syllable, except
// the last one, which stays put so the note reads as complete.
fn settle(branch: Branch, syllables: &[Syllable]) -> Branch {
    let paths = &syllables[branch.syllable].romaji;
    let is_last = branch.syllable + 1 == syllables.len();
    let longer_alive = paths
        .iter()
        .any(|path| path.len() > branch.typed.len() && path.starts_with(branch.typed.as_str()));

    if !is_last && !longer_alive && fully_matches(paths, &branch.typed) {
        Branch::start(branch.syllable + 1)
    } else {
        branch
    }
}

fn remaining_for(branch: &Branch, syllables: &[Syllable]) -> String {
    let mut out = String::new();
    if let Some(current) = syllables.get(branch.syllable) {
        let open = current
            .romaji
            .iter()
            .find(|path| path.starts_with(branch.typed.as_str()));
        if let Some(path) = open {
            out.push_str(&path[branch.typed.len()..]);
        }
    }
    for syllable in syllables.iter().skip(branch.syllable + 1) {
        if let Some(path) = syllable.romaji.first() {
            out.push_str(path);
        }
    }
    out
}

fn extends(paths: &[String], typed: &str, c: char) -> bool {
    paths
        .iter()
        .any(|path| path.starts_with(typed) && path[typed.len()..].starts_with(c))
}

fn fully_matches(paths: &[String], typed: &str) -> bool {
    !typed.is_empty() && paths.iter().any(|path| path == typed)
}
