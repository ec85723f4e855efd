//! Hiragana to romaji lookup. Katakana is folded onto these entries before lookup.

pub(crate) static SINGLE: &[(char, &[&str])] = &[
    ('あ', &["a"]),
    ('い', &["i", "yi"]),
    ('う', &["u", "wu", "whu"]),
    ('え', &["e"]),
    ('お', &["o"]),
    ('か', &["ka", "ca"]),
    ('き', &["ki"]),
    ('く', &["ku", "cu", "qu"]),
    ('け', &["ke"]),
    ('こ', &["ko", "co"]),
    ('さ', &["sa"]),
    ('し', &["shi", "si", "ci"]),
    ('す', &["su"]),
    ('せ', &["se", "ce"]),
    ('そ', &["so"]),
    ('た', &["ta"]),
    ('ち', &["chi", "ti"]),
    ('つ', &["tsu", "tu"]),
    ('て', &["te"]),
    ('と', &["to"]),
    ('な', &["na"]),
    ('に', &["ni"]),
    ('ぬ', &["nu"]),
    ('ね', &["ne"]),
    ('の', &["no"]),
    ('は', &["ha"]),
    ('ひ', &["hi"]),
    ('ふ', &["fu", "hu"]),
    ('へ', &["he"]),
    ('ほ', &["ho"]),
    ('ま', &["ma"]),
    ('み', &["mi"]),
    ('む', &["mu"]),
    ('め', &["me"]),
    ('も', &["mo"]),
    ('や', &["ya"]),
    ('ゆ', &["yu"]),
    ('よ', &["yo"]),
    ('ら', &["ra"]),
    ('り', &["ri"]),
    ('る', &["ru"]),
    ('れ', &["re"]),
    ('ろ', &["ro"]),
    ('わ', &["wa"]),
    ('ゐ', &["wi"]),
    ('ゑ', &["we"]),
    ('を', &["wo"]),
    ('が', &["ga"]),
    ('ぎ', &["gi"]),
    ('ぐ', &["gu"]),
    ('げ', &["ge"]),
    ('ご', &["go"]),
    ('ざ', &["za"]),
    ('じ', &["ji", "zi"]),
    ('ず', &["zu"]),
    ('ぜ', &["ze"]),
    ('ぞ', &["zo"]),
    ('だ', &["da"]),
    ('ぢ', &["di"]),
    ('づ', &["du"]),
    ('で', &["de"]),
    ('ど', &["do"]),
    ('ば', &["ba"]),
    ('び', &["bi"]),
    ('ぶ', &["bu"]),
    ('べ', &["be"]),
    ('ぼ', &["bo"]),
    ('ぱ', &["pa"]),
    ('ぴ', &["pi"]),
    ('ぷ', &["pu"]),
    ('ぺ', &["pe"]),
    ('ぽ', &["po"]),
    ('ゔ', &["vu"]),
    ('ぁ', &["la", "xa"]),
    ('ぃ', &["li", "xi"]),
    ('ぅ', &["lu", "xu"]),
    ('ぇ', &["le", "xe"]),
    ('ぉ', &["lo", "xo"]),
    ('ゃ', &["lya", "xya"]),
    ('ゅ', &["lyu", "xyu"]),
    ('ょ', &["lyo", "xyo"]),
    ('ゎ', &["lwa", "xwa"]),
    ('ゕ', &["lka", "xka"]),
    ('ゖ', &["lke", "xke"]),
    ('ー', &["-"]),
    ('、', &[","]),
    ('。', &["."]),
    ('・', &["/"]),
    ('「', &["["]),
    ('」', &["]"]),
    ('〜', &["~"]),
    ('\u{3000}', &[" "]),
];

pub(crate) static DIGRAPH: &[(&str, &[&str])] = &[
    ("きゃ", &["kya"]),
    ("きぃ", &["kyi"]),
    ("きゅ", &["kyu"]),
    ("きぇ", &["kye"]),
    ("きょ", &["kyo"]),
    ("しゃ", &["sha", "sya"]),
    ("しゅ", &["shu", "syu"]),
    ("しぇ", &["she", "sye"]),
    ("しょ", &["sho", "syo"]),
    ("ちゃ", &["cha", "tya", "cya"]),
    ("ちゅ", &["chu", "tyu", "cyu"]),
    ("ちぇ", &["che", "tye", "cye"]),
    ("ちょ", &["cho", "tyo", "cyo"]),
    ("にゃ", &["nya"]),
    ("にゅ", &["nyu"]),
    ("にょ", &["nyo"]),
    ("ひゃ", &["hya"]),
    ("ひゅ", &["hyu"]),
    ("ひょ", &["hyo"]),
    ("みゃ", &["mya"]),
    ("みゅ", &["myu"]),
    ("みょ", &["myo"]),
    ("りゃ", &["rya"]),
    ("りゅ", &["ryu"]),
    ("りょ", &["ryo"]),
    ("ぎゃ", &["gya"]),
    ("ぎゅ", &["gyu"]),
    ("ぎょ", &["gyo"]),
    ("じゃ", &["ja", "zya", "jya"]),
    ("じゅ", &["ju", "zyu", "jyu"]),
    ("じぇ", &["je", "zye", "jye"]),
    ("じょ", &["jo", "zyo", "jyo"]),
    ("ぢゃ", &["dya"]),
    ("ぢゅ", &["dyu"]),
    ("ぢょ", &["dyo"]),
    ("びゃ", &["bya"]),
    ("びゅ", &["byu"]),
    ("びょ", &["byo"]),
    ("ぴゃ", &["pya"]),
    ("ぴゅ", &["pyu"]),
    ("ぴょ", &["pyo"]),
    ("ふぁ", &["fa"]),
    ("ふぃ", &["fi"]),
    ("ふぇ", &["fe"]),
    ("ふぉ", &["fo"]),
    ("ふゅ", &["fyu"]),
    ("てぃ", &["thi"]),
    ("てゅ", &["thu"]),
    ("でぃ", &["dhi"]),
    ("でゅ", &["dhu"]),
    ("とぅ", &["twu"]),
    ("どぅ", &["dwu"]),
    ("うぃ", &["wi", "whi"]),
    ("うぇ", &["we", "whe"]),
    ("うぉ", &["who"]),
    ("ゔぁ", &["va"]),
    ("ゔぃ", &["vi"]),
    ("ゔぇ", &["ve"]),
    ("ゔぉ", &["vo"]),
    ("つぁ", &["tsa"]),
    ("いぇ", &["ye"]),
];

pub(crate) const SOKUON: char = 'っ';
pub(crate) const HATSUON: char = 'ん';
pub(crate) const SMALL_TSU: &[&str] = &["ltu", "xtu", "ltsu", "xtsu"];

pub(crate) fn single(c: char) -> Option<&'static [&'static str]> {
    SINGLE
        .iter()
        .find(|(kana, _)| *kana == c)
        .map(|(_, romaji)| *romaji)
}

pub(crate) fn digraph(pair: &str) -> Option<&'static [&'static str]> {
    DIGRAPH
        .iter()
        .find(|(kana, _)| *kana == pair)
        .map(|(_, romaji)| *romaji)
}
