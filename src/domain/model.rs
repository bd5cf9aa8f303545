use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// 一筆資料：欄位名稱對應 JSON 值的開放映射
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 物件建立記錄，非物件的值會被拒絕
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Object(obj) => Some(Self {
                data: obj.into_iter().collect(),
            }),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.get(field)
    }

    /// 欄位存在且不是 null
    pub fn has_value(&self, field: &str) -> bool {
        matches!(self.data.get(field), Some(v) if !v.is_null())
    }

    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.data.get(field).and_then(|v| v.as_f64())
    }

    /// 回傳新增或覆寫一個欄位後的新記錄，不動原本的記錄
    pub fn with_field(&self, field: &str, value: serde_json::Value) -> Self {
        let mut data = self.data.clone();
        data.insert(field.to_string(), value);
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, serde_json::Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, serde_json::Value)>>(iter: T) -> Self {
        Self {
            data: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 依欄位名稱排序，輸出才穩定
        let sorted: BTreeMap<&String, &serde_json::Value> = self.data.iter().collect();
        let text = serde_json::to_string(&sorted).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// 在步驟之間流動的資料：一串記錄，或是彙總後的單一記錄
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Dataset {
    Records(Vec<Record>),
    Summary(Record),
}

impl Dataset {
    pub fn records(&self) -> Option<&[Record]> {
        match self {
            Dataset::Records(records) => Some(records),
            Dataset::Summary(_) => None,
        }
    }

    pub fn summary(&self) -> Option<&Record> {
        match self {
            Dataset::Summary(summary) => Some(summary),
            Dataset::Records(_) => None,
        }
    }

    pub fn is_summary(&self) -> bool {
        matches!(self, Dataset::Summary(_))
    }

    pub fn shape(&self) -> &'static str {
        match self {
            Dataset::Records(_) => "record sequence",
            Dataset::Summary(_) => "summary record",
        }
    }

    /// 以排序後欄位輸出的 JSON 值
    pub fn to_sorted_json(&self) -> serde_json::Value {
        fn sorted(record: &Record) -> serde_json::Value {
            let map: serde_json::Map<String, serde_json::Value> = record
                .data
                .iter()
                .collect::<BTreeMap<_, _>>()
                .into_iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            serde_json::Value::Object(map)
        }

        match self {
            Dataset::Records(records) => {
                serde_json::Value::Array(records.iter().map(sorted).collect())
            }
            Dataset::Summary(summary) => sorted(summary),
        }
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Dataset::Records(records)
    }
}
