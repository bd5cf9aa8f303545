use crate::domain::model::{Dataset, Record};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 一個獨立的資料來源，延遲後回傳一串記錄
#[async_trait]
pub trait Source: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch(&self) -> Result<Vec<Record>>;
}

/// Pipeline 中的單一步驟。輸入只借用，輸出一律是新配置的資料。
pub trait Step: Send + Sync {
    fn name(&self) -> &str;
    fn transform(&self, input: &Dataset) -> Result<Dataset>;
}

impl<S: Step + ?Sized> Step for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn transform(&self, input: &Dataset) -> Result<Dataset> {
        (**self).transform(input)
    }
}
