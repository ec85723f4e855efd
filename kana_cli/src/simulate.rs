use kana_core::gameplay::Outcome;
use kana_core::romaji;
use kana_runner::PlayReport;
use kana_schema::Beatmap;

pub fn print_timeline(map: &Beatmap, report: &PlayReport) {
    if map.notes.is_empty() {
        println!("Beatmap has no notes.");
        return;
    }

    println!(
        "Replay of {} (strictness {:.2})",
        report.beatmap_id, report.strictness
    );
    println!("Time(ms) | Note | Outcome   | Delta(ms) | Text");
    println!("---------|------|-----------|-----------|------------------");

    for verdict in &report.verdicts {
        let outcome = match verdict.outcome {
            Outcome::Hit(grade) => format!("{grade:?}"),
            Outcome::Miss => "Miss".to_string(),
        };
        let delta = verdict
            .delta_ms
            .map(|d| format!("{d:+.1}"))
            .unwrap_or_else(|| "-".to_string());
        let text = map
            .notes
            .get(verdict.note)
            .map(|n| n.text.as_str())
            .unwrap_or("");

        println!(
            "{:8.1} | {:4} | {:9} | {:>9} | {}",
            verdict.time, verdict.note, outcome, delta, text
        );
    }
}

pub fn print_syllables(text: &str) {
    for syllable in romaji::syllabify(text) {
        if syllable.romaji.is_empty() {
            println!("{}\t(untypeable)", syllable.kana);
        } else {
            println!("{}\t{}", syllable.kana, syllable.romaji.join(" / "));
        }
    }
}
