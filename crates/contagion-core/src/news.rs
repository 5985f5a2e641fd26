//! In-game calendar and headline ticker.
//!
//! Not part of the simulation proper: the presentation layer reads the date
//! once per refresh, and each read moves the calendar forward one day.

use std::collections::VecDeque;

use chrono::{Datelike, NaiveDate};

use crate::config::NewsConfig;

const DATE_FORMAT: &str = "%d %b %Y";
const TICKER_GAP: &str = "          ";
const START_YEAR: i32 = 1960;

/// Date cursor plus a bounded list of headlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsFeed {
    date: NaiveDate,
    headlines: VecDeque<String>,
    max_headlines: usize,
    scroll: usize,
}

impl NewsFeed {
    /// Create a feed starting at `date`.
    ///
    /// Only the newest `max_headlines` of `headlines` are kept.
    pub fn new(date: NaiveDate, headlines: Vec<String>, max_headlines: usize) -> Self {
        let mut feed = Self {
            date,
            headlines: VecDeque::with_capacity(max_headlines),
            max_headlines,
            scroll: 0,
        };
        for headline in headlines {
            feed.push_headline(headline);
        }
        feed
    }

    /// Build a feed from configuration. Without a configured start date the
    /// calendar opens on `today`'s month and day in 1960.
    pub fn from_config(config: &NewsConfig, today: NaiveDate) -> Self {
        let start = config.start_date.unwrap_or_else(|| default_start(today));
        Self::new(start, config.headlines.clone(), config.max_headlines)
    }

    /// Current date without advancing.
    pub const fn current(&self) -> NaiveDate {
        self.date
    }

    /// Return the current date as `"%d %b %Y"` and advance one day.
    pub fn next_date(&mut self) -> String {
        let text = self.date.format(DATE_FORMAT).to_string();
        if let Some(next) = self.date.succ_opt() {
            self.date = next;
        }
        text
    }

    /// Append a headline, dropping the oldest beyond the limit.
    pub fn push_headline(&mut self, headline: String) {
        self.headlines.push_back(headline);
        while self.headlines.len() > self.max_headlines {
            self.headlines.pop_front();
        }
    }

    /// Headlines, oldest first.
    pub fn headlines(&self) -> impl Iterator<Item = &str> {
        self.headlines.iter().map(String::as_str)
    }

    /// All headlines on one line, each preceded by a ten-space gap.
    pub fn ticker(&self) -> String {
        let mut out = String::from(TICKER_GAP);
        let joined: Vec<&str> = self.headlines().collect();
        out.push_str(&joined.join(TICKER_GAP));
        out
    }

    /// The ticker rotated left by the scroll cursor, which then moves one
    /// character on.
    pub fn scrolled(&mut self) -> String {
        let ticker = self.ticker();
        let len = ticker.chars().count();
        let start = self.scroll.checked_rem(len).unwrap_or(0);
        self.scroll = start.saturating_add(1);
        ticker.chars().cycle().skip(start).take(len).collect()
    }
}

/// Today's month and day in 1960. 29 February falls back to the 28th.
pub fn default_start(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(START_YEAR, today.month(), today.day())
        .or_else(|| NaiveDate::from_ymd_opt(START_YEAR, today.month(), 28))
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_returns_then_advances() {
        let mut feed = NewsFeed::new(date(1960, 12, 31), Vec::new(), 4);
        assert_eq!(feed.next_date(), "31 Dec 1960");
        assert_eq!(feed.next_date(), "01 Jan 1961");
        assert_eq!(feed.current(), date(1961, 1, 2));
    }

    #[test]
    fn default_start_is_1960() {
        assert_eq!(default_start(date(2026, 10, 15)), date(1960, 10, 15));
        // 1960 is a leap year, so the 29th survives.
        assert_eq!(default_start(date(2024, 2, 29)), date(1960, 2, 29));
    }

    #[test]
    fn configured_start_wins() {
        let config = NewsConfig {
            start_date: Some(date(1960, 3, 1)),
            ..NewsConfig::default()
        };
        let feed = NewsFeed::from_config(&config, date(2026, 10, 15));
        assert_eq!(feed.current(), date(1960, 3, 1));
    }

    #[test]
    fn headlines_are_capped() {
        let mut feed = NewsFeed::new(date(1960, 1, 1), Vec::new(), 4);
        for i in 0..6 {
            feed.push_headline(format!("h{i}"));
        }
        let kept: Vec<&str> = feed.headlines().collect();
        assert_eq!(kept, ["h2", "h3", "h4", "h5"]);
    }

    #[test]
    fn ticker_layout() {
        let feed = NewsFeed::new(date(1960, 1, 1), vec!["a".into(), "b".into()], 4);
        assert_eq!(feed.ticker(), "          a          b");
    }

    #[test]
    fn scrolling_rotates_and_wraps() {
        let mut feed = NewsFeed::new(date(1960, 1, 1), Vec::new(), 4);
        // Empty feed is just the gap.
        assert_eq!(feed.scrolled(), TICKER_GAP);

        let mut feed = NewsFeed::new(date(1960, 1, 1), vec!["ab".into()], 4);
        let first = feed.scrolled();
        let second = feed.scrolled();
        assert_eq!(first, "          ab");
        assert_eq!(second, "         ab ");
        for _ in 0..10 {
            let _ = feed.scrolled();
        }
        // Twelve characters: back at the start.
        assert_eq!(feed.scrolled(), "          ab");
    }
}
