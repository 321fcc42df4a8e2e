//! Reading statistics: per-book tracking, genre classification and pace.

use super::{mean, round_to, YearMonth};
use crate::constants::RETURNED_TITLE_PREFIX_CHARS;
use crate::journal_core::{short_title, DailyRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use tracing::debug;

/// Words that mark an unclassified title as fiction.
const FICTION_WORDS: [&str; 3] = ["小説", "物語", "文庫"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Genre {
    Mystery,
    Religion,
    Horror,
    SelfHelp,
    HealthScience,
    Society,
    OtherFiction,
    Other,
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Genre::Mystery => "Mystery",
            Genre::Religion => "Buddhism & Religion",
            Genre::Horror => "Horror & Supernatural",
            Genre::SelfHelp => "Self-help & Learning",
            Genre::HealthScience => "Health & Science",
            Genre::Society => "Society & Nonfiction",
            Genre::OtherFiction => "Other fiction",
            Genre::Other => "Other",
        };
        f.write_str(name)
    }
}

/// One row of the classification table.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreRule {
    pub genre: Genre,
    pub authors: Vec<String>,
    pub keywords: Vec<String>,
}

impl GenreRule {
    pub fn new(genre: Genre, authors: &[&str], keywords: &[&str]) -> Self {
        GenreRule {
            genre,
            authors: authors.iter().map(|s| s.to_string()).collect(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn matches(&self, title: &str) -> bool {
        self.keywords
            .iter()
            .chain(self.authors.iter())
            .any(|needle| !needle.is_empty() && title.contains(needle.as_str()))
    }
}

/// Ordered genre rules. The first rule that matches a title decides its genre.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreTable {
    pub rules: Vec<GenreRule>,
}

impl GenreTable {
    pub fn new(rules: Vec<GenreRule>) -> Self {
        GenreTable { rules }
    }

    /// Classifies a note title, which usually carries the author after ` - `.
    ///
    /// ```
    /// use lifelog::stats::reading::{Genre, GenreTable};
    ///
    /// let table = GenreTable::default();
    /// assert_eq!(table.classify("容疑者Xの献身 - 東野圭吾"), Genre::Mystery);
    /// assert_eq!(table.classify("無名の本"), Genre::Other);
    /// ```
    pub fn classify(&self, title: &str) -> Genre {
        if let Some(rule) = self.rules.iter().find(|rule| rule.matches(title)) {
            return rule.genre;
        }
        if FICTION_WORDS.iter().any(|word| title.contains(word)) {
            Genre::OtherFiction
        } else {
            Genre::Other
        }
    }
}

impl Default for GenreTable {
    fn default() -> Self {
        GenreTable::new(vec![
            GenreRule::new(
                Genre::Mystery,
                &[
                    "道尾秀介", "東野圭吾", "今村昌弘", "阿津川辰海", "我孫子武丸", "浦賀和宏",
                    "詠坂雄二", "似鳥鶏", "東川篤哉", "西式豊", "西式 豊", "西澤保彦",
                    "五十嵐律人", "潮谷験", "大山誠一郎", "知念実希人", "三日市零", "村上暢",
                    "早坂吝", "紺野天龍", "神永学", "誉田哲也", "住田祐", "小倉千明",
                    "田村和大", "クレイヴン", "フリーダ", "梨",
                ],
                &[
                    "殺人", "ミステリー", "密室", "探偵", "八雲", "Jミステリー", "カラスの親指",
                    "カエルの小指", "マスカレード", "ロンド", "Another", "ＡＮＯＴＨＥＲＳの殺人",
                    "シンデレラ城", "ハウスメイド", "操る男", "亡霊", "仕掛島", "ラットマン",
                    "復讐は", "硝子の塔", "白鷺立つ", "デスチェア", "嘘つき", "兇人邸",
                    "透明人間は密室", "不在の生存証明", "迷宮牢", "推理大戦", "裁く眼",
                    "にいたる病", "身から出た闇", "時空犯", "幻告",
                ],
            ),
            GenreRule::new(
                Genre::Religion,
                &["梶山雄一", "四夷法顕", "菊地章太", "玄侑宗久", "平雅行"],
                &["仏教", "浄土", "輪廻", "華厳", "鎌倉仏教", "儒教", "道教", "涅槃", "衆生"],
            ),
            GenreRule::new(
                Genre::Horror,
                &["背筋", "小松左京", "小松 左京"],
                &["恐怖", "ＳＦ", "牛の首", "ホラー", "心霊"],
            ),
            GenreRule::new(
                Genre::SelfHelp,
                &[
                    "樺沢紫苑", "榎本博明", "石田光規", "徳谷智史", "井上慎平", "西岡壱誠",
                    "ベンジャミン", "山口 周", "山口周", "サルマン・カーン", "八木",
                    "キム・イッカン", "アダム・グラント", "大塚あみ", "出口治明", "毛内拡",
                ],
                &[
                    "勉強", "集中力", "全力化", "自己成長", "経営", "HIDDEN", "読書を仕事",
                    "読書する脳", "100日チャレンジ", "世界一ゆるい", "巨人のノート",
                    "セカンド・チャンス", "可能性の科学",
                ],
            ),
            GenreRule::new(
                Genre::HealthScience,
                &["池田光史", "石川泰弘", "東島威史", "稲葉俊郎", "リーバーマン"],
                &["歩く", "睡眠", "不夜脳", "運動の科学", "メディスン", "ぐっすり眠れる"],
            ),
            GenreRule::new(
                Genre::Society,
                &["パオロ", "富永京子", "宮下英樹", "大城道則", "オードリー", "李雅卿"],
                &[
                    "社会", "ヘンなの", "なぜ社会", "古代文字", "歴史", "落とし穴", "宅建士",
                ],
            ),
        ])
    }
}

/// Everything the corpus says about one title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedBook {
    pub title: String,
    pub genre: Genre,
    pub first_seen: NaiveDate,
    pub last_seen: NaiveDate,
    /// Date of the last mention that marked the book finished.
    pub finished: Option<NaiveDate>,
    pub days_seen: usize,
    pub returned: bool,
}

impl TrackedBook {
    fn new(title: &str, genre: Genre, date: NaiveDate) -> Self {
        TrackedBook {
            title: title.to_string(),
            genre,
            first_seen: date,
            last_seen: date,
            finished: None,
            days_seen: 0,
            returned: false,
        }
    }

    /// Days from the first mention to the finishing mention, inclusive.
    pub fn reading_days(&self) -> Option<i64> {
        self.finished
            .map(|finished| (finished - self.first_seen).num_days() + 1)
    }
}

/// Returns at most the first `n` characters of `s`.
fn char_prefix(s: &str, n: usize) -> &str {
    s.char_indices().nth(n).map_or(s, |(idx, _)| &s[..idx])
}

/// Whether an unfinished book was given back unread.
///
/// Titles sharing their first few characters match, so distinct books in a
/// series can collide.
fn is_returned(short: &str, returned: &HashSet<String>, excluded: &HashSet<String>) -> bool {
    if short.is_empty() {
        return false;
    }
    let excluded_hit = excluded
        .iter()
        .filter(|title| !title.is_empty())
        .any(|title| title.contains(short) || short.contains(title.as_str()));
    if excluded_hit {
        return true;
    }

    let prefix = char_prefix(short, RETURNED_TITLE_PREFIX_CHARS);
    returned
        .iter()
        .filter(|title| !title.is_empty())
        .any(|title| {
            title.contains(prefix)
                || short.contains(char_prefix(title, RETURNED_TITLE_PREFIX_CHARS))
                || title.contains(short)
                || short.contains(title.as_str())
        })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingSummary {
    /// Books that count, in order of first mention.
    pub books: Vec<TrackedBook>,
    pub returned_count: usize,
    pub genre_counts: BTreeMap<Genre, usize>,
    pub genre_finished: BTreeMap<Genre, usize>,
    /// Finished books per month of finishing, by genre.
    pub monthly_genre: BTreeMap<YearMonth, BTreeMap<Genre, usize>>,
    /// Mean reading days of finished books, one decimal; 0 without any.
    pub avg_pace: f64,
    pub total: usize,
    pub finished: usize,
}

impl ReadingSummary {
    /// Builds the summary from date-ordered records.
    ///
    /// `returned` holds library titles given back unfinished and `excluded`
    /// holds titles to ignore by hand. Both only apply to unfinished books.
    pub fn build(
        records: &[DailyRecord],
        table: &GenreTable,
        returned: &HashSet<String>,
        excluded: &HashSet<String>,
    ) -> Self {
        let mut order: Vec<String> = Vec::new();
        let mut tracker: HashMap<String, TrackedBook> = HashMap::new();
        for record in records {
            for mention in &record.books {
                let book = tracker.entry(mention.title.clone()).or_insert_with(|| {
                    order.push(mention.title.clone());
                    TrackedBook::new(&mention.title, table.classify(&mention.title), record.date)
                });
                book.last_seen = record.date;
                book.days_seen += 1;
                if mention.finished {
                    book.finished = Some(record.date);
                }
            }
        }

        let mut books = Vec::with_capacity(order.len());
        let mut returned_count = 0;
        for title in order {
            let Some(mut book) = tracker.remove(&title) else {
                continue;
            };
            if book.finished.is_none() && is_returned(short_title(&book.title), returned, excluded)
            {
                book.returned = true;
                returned_count += 1;
                debug!("Excluding returned book: {}", book.title);
                continue;
            }
            books.push(book);
        }

        let mut genre_counts = BTreeMap::new();
        let mut genre_finished = BTreeMap::new();
        let mut monthly_genre: BTreeMap<YearMonth, BTreeMap<Genre, usize>> = BTreeMap::new();
        for book in &books {
            *genre_counts.entry(book.genre).or_insert(0) += 1;
            if let Some(finished) = book.finished {
                *genre_finished.entry(book.genre).or_insert(0) += 1;
                *monthly_genre
                    .entry(YearMonth::of(finished))
                    .or_default()
                    .entry(book.genre)
                    .or_insert(0) += 1;
            }
        }

        let paces: Vec<f64> = books
            .iter()
            .filter_map(TrackedBook::reading_days)
            .map(|days| days as f64)
            .collect();

        ReadingSummary {
            total: books.len(),
            finished: books.iter().filter(|b| b.finished.is_some()).count(),
            avg_pace: mean(&paces).map_or(0.0, |pace| round_to(pace, 1)),
            returned_count,
            genre_counts,
            genre_finished,
            monthly_genre,
            books,
        }
    }
}
