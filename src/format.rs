// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString as _};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;
use std::rc::Rc;

/// Currency display rules resolved for one (locale, currency) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    locale: Locale,
    symbol: String,
    decimals: u32,
}

fn symbol_for(code: &str) -> String {
    match code {
        "USD" | "CAD" | "AUD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        "JPY" => "¥".to_string(),
        "INR" => "₹".to_string(),
        other => format!("{} ", other),
    }
}

fn decimals_for(code: &str) -> u32 {
    match code {
        "JPY" | "KRW" => 0,
        _ => 2,
    }
}

impl CurrencyFormat {
    pub fn new(locale: &str, currency: &str) -> Self {
        let code = currency.trim().to_uppercase();
        CurrencyFormat {
            locale: Locale::from_name(locale).unwrap_or(Locale::en),
            symbol: symbol_for(&code),
            decimals: decimals_for(&code),
        }
    }

    /// `-1234.5` in en/USD renders as `-$1,234.50`.
    pub fn format(&self, amount: Decimal) -> String {
        let rounded =
            amount.round_dp_with_strategy(self.decimals, RoundingStrategy::MidpointAwayFromZero);
        let abs = rounded.abs();
        let whole = abs.trunc();
        let whole_i = whole.to_i128().unwrap_or(0);
        let grouped = whole_i.to_formatted_string(&self.locale);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        if self.decimals == 0 {
            return format!("{}{}{}", sign, self.symbol, grouped);
        }
        let frac = ((abs - whole) * Decimal::from(10i64.pow(self.decimals)))
            .trunc()
            .to_string();
        format!(
            "{}{}{}{}{:0>width$}",
            sign,
            self.symbol,
            grouped,
            self.locale.decimal(),
            frac,
            width = self.decimals as usize
        )
    }
}

/// Formatters keyed by (locale, currency). Create one at startup and pass it
/// to whatever renders money.
#[derive(Debug, Default)]
pub struct FormatterCache {
    entries: HashMap<(String, String), Rc<CurrencyFormat>>,
}

impl FormatterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, locale: &str, currency: &str) -> Rc<CurrencyFormat> {
        let key = (locale.to_string(), currency.trim().to_uppercase());
        self.entries
            .entry(key)
            .or_insert_with_key(|(l, c)| Rc::new(CurrencyFormat::new(l, c)))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `2025-01-05` renders as `Jan 5, 2025`; anything unparseable yields `fallback`.
pub fn format_date(value: Option<&str>, fallback: &str) -> String {
    value
        .and_then(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok())
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| fallback.to_string())
}

/// `part` as a share of `whole`; `n/a` for a zero base or an unrepresentable ratio.
pub fn format_percent(part: Decimal, whole: Decimal) -> String {
    match part
        .checked_div(whole)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
    {
        Some(pct) => format!(
            "{:.1}%",
            pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        ),
        None => "n/a".to_string(),
    }
}
