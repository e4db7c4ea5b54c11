// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod history_tests;

use adc_desk_domain::{HistoryItem, SearchMode};

pub fn create_history_item(ic: &str, timestamp: i64) -> HistoryItem {
    HistoryItem {
        id: timestamp.to_string(),
        ic: ic.to_string(),
        cif: format!("CIF-{ic}"),
        business_name: format!("Cliente {ic}"),
        last_name1: None,
        search_mode: SearchMode::Ic,
        search_value: ic.to_string(),
        timestamp,
    }
}
