//! 列表变量编解码与编辑 (PATH 一类以 `;` 分隔的变量)
//!
//! 规则：
//! - 空字符串解码为空列表（零个条目），非空字符串按 `;` 逐字切分，
//!   已存在的空条目（如 `";A"`）原样保留
//! - 条目比较不区分大小写，存储保留最后一次写入的大小写
//! - 条目本身不做转义，包含 `;` 的条目由调用方负责

use crate::types::Position;

/// 条目分隔符
pub const DELIMITER: char = ';';

/// 有序条目列表
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryList {
    entries: Vec<String>,
}

/// `add` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddReport {
    /// 条目原本已存在（本次是移动）
    pub existed: bool,
    /// `Before` 的锚点未找到，已退回到末尾追加
    pub anchor_missing: bool,
}

/// 不区分大小写的条目比较
fn same_entry(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

impl EntryList {
    /// 解码存储的原始字符串
    #[must_use]
    pub fn decode(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::default();
        }
        Self {
            entries: raw.split(DELIMITER).map(str::to_string).collect(),
        }
    }

    /// 编码为存储用的原始字符串
    #[must_use]
    pub fn encode(&self) -> String {
        self.entries.join(DELIMITER.to_string().as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// 不区分大小写的成员检查
    #[must_use]
    pub fn contains(&self, entry: &str) -> bool {
        self.entries.iter().any(|e| same_entry(e, entry))
    }

    /// 添加条目；已存在的同名条目先被移除，再按 `position` 放置
    pub fn add(&mut self, entry: &str, position: &Position) -> AddReport {
        let existed = self.remove(entry);
        let mut anchor_missing = false;

        let index = match position {
            Position::Append => self.entries.len(),
            Position::Prepend => 0,
            Position::Before(anchor) => {
                match self.entries.iter().position(|e| same_entry(e, anchor)) {
                    Some(i) => i,
                    None => {
                        anchor_missing = true;
                        self.entries.len()
                    }
                }
            }
        };
        self.entries.insert(index, entry.to_string());

        AddReport {
            existed,
            anchor_missing,
        }
    }

    /// 移除所有匹配条目，返回是否有匹配
    pub fn remove(&mut self, entry: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| !same_entry(e, entry));
        self.entries.len() != before
    }
}

impl<'a> FromIterator<&'a str> for EntryList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(str::to_string).collect(),
        }
    }
}
