//! 作者相关的数据模型

use serde::Deserialize;
use std::fmt::Display;

/// 表单中的一个作者槽位（原始输入，未校验）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorSlot {
    #[serde(default, rename = "nome", alias = "given_name")]
    pub given_name: String,
    #[serde(default, rename = "cognome", alias = "family_name")]
    pub family_name: String,
    #[serde(default, rename = "scholar_id", alias = "id")]
    pub scholar_id: String,
}

impl AuthorSlot {
    pub fn new(
        given_name: impl Into<String>,
        family_name: impl Into<String>,
        scholar_id: impl Into<String>,
    ) -> Self {
        Self {
            given_name: given_name.into(),
            family_name: family_name.into(),
            scholar_id: scholar_id.into(),
        }
    }

    /// 三个字段去除空白后都非空时，才产生一条有效记录
    pub fn validate(&self) -> Option<InputRecord> {
        let given_name = self.given_name.trim();
        let family_name = self.family_name.trim();
        let scholar_id = self.scholar_id.trim();

        if given_name.is_empty() || family_name.is_empty() || scholar_id.is_empty() {
            return None;
        }

        Some(InputRecord {
            given_name: given_name.to_string(),
            family_name: family_name.to_string(),
            external_scholar_id: scholar_id.to_string(),
        })
    }
}

/// 一条通过校验的作者记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    given_name: String,
    family_name: String,
    external_scholar_id: String,
}

impl InputRecord {
    pub fn given_name(&self) -> &str {
        &self.given_name
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn external_scholar_id(&self) -> &str {
        &self.external_scholar_id
    }

    /// 行中显示的作者全名
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

impl Display for InputRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (Scholar: {})", self.full_name(), self.external_scholar_id)
    }
}

/// 搜索服务返回的候选作者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub display_name: String,
    pub affiliation: String,
    /// 文献数量（后端可能不提供）
    pub documents: Option<String>,
    pub city: Option<String>,
}

impl Candidate {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        affiliation: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            affiliation: affiliation.into(),
            documents: None,
            city: None,
        }
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.display_name, self.affiliation)?;
        if let Some(city) = self.city.as_deref().filter(|c| !c.is_empty()) {
            write!(f, " - {}", city)?;
        }
        if let Some(documents) = &self.documents {
            write!(f, " [{} doc]", documents)?;
        }
        Ok(())
    }
}

/// 确定下来的作者身份，只保留处理阶段需要的字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub id: String,
    pub display_name: String,
}

impl From<Candidate> for ResolvedIdentity {
    fn from(candidate: Candidate) -> Self {
        Self {
            id: candidate.id,
            display_name: candidate.display_name,
        }
    }
}

/// 按槽位顺序收集有效记录，最多考虑 `max_slots` 个槽位
pub fn collect_valid_records(slots: &[AuthorSlot], max_slots: usize) -> Vec<InputRecord> {
    slots
        .iter()
        .take(max_slots)
        .filter_map(AuthorSlot::validate)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_with_all_fields_is_valid_and_trimmed() {
        let slot = AuthorSlot::new("  Mario ", "Rossi\t", " 123 ");
        let record = slot.validate().expect("slot should validate");
        assert_eq!(record.given_name(), "Mario");
        assert_eq!(record.family_name(), "Rossi");
        assert_eq!(record.external_scholar_id(), "123");
        assert_eq!(record.full_name(), "Mario Rossi");
    }

    #[test]
    fn slot_is_included_only_when_every_field_is_filled() {
        let cases = [
            ("", "B", "1"),
            ("A", "", "1"),
            ("A", "B", ""),
            ("   ", "B", "1"),
            ("A", "  ", "1"),
            ("A", "B", " \n"),
            ("", "", ""),
        ];
        for (given, family, id) in cases {
            assert!(
                AuthorSlot::new(given, family, id).validate().is_none(),
                "({given:?}, {family:?}, {id:?}) should be rejected"
            );
        }
        assert!(AuthorSlot::new("A", "B", "1").validate().is_some());
    }

    #[test]
    fn collect_keeps_slot_order_and_respects_limit() {
        let slots = vec![
            AuthorSlot::new("A", "One", "1"),
            AuthorSlot::new("", "Skip", "2"),
            AuthorSlot::new("C", "Three", "3"),
            AuthorSlot::new("D", "Four", "4"),
        ];
        let records = collect_valid_records(&slots, 3);
        let names: Vec<_> = records.iter().map(InputRecord::full_name).collect();
        assert_eq!(names, vec!["A One", "C Three"]);
    }

    #[test]
    fn resolved_identity_keeps_id_and_name() {
        let candidate = Candidate::new("9", "A B", "X");
        let resolved = ResolvedIdentity::from(candidate);
        assert_eq!(resolved.id, "9");
        assert_eq!(resolved.display_name, "A B");
    }
}
