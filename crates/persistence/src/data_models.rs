// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;

use crate::diesel_schema::kv_store;

/// One row of the key-value table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = kv_store)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct KvEntry {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

/// A value to store under a key.
#[derive(Debug, Insertable)]
#[diesel(table_name = kv_store)]
pub struct NewKvEntry<'a> {
    pub key: &'a str,
    pub value: &'a str,
}
