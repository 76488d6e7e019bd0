use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::fs;

// rust 的 async trait 还没有稳定，可以用async_trait 宏
#[async_trait]
pub trait Fetch {
    type Error;
    async fn fetch(&self) -> Result<Vec<u8>, Self::Error>;
}

/// 从文件源或者 http 源中获取原始字节流
pub async fn retrieve_data(source: impl AsRef<str>) -> Result<Vec<u8>> {
    let name = source.as_ref();
    if name.starts_with("http") {
        UrlFetcher(name).fetch().await
    } else if name.starts_with("file://") {
        FileFetcher(name).fetch().await
    } else {
        Err(anyhow!("We only support http/https/file at the moment"))
    }
}

struct UrlFetcher<'a>(pub(crate) &'a str);

#[async_trait]
impl<'a> Fetch for UrlFetcher<'a> {
    type Error = anyhow::Error;

    async fn fetch(&self) -> Result<Vec<u8>, Self::Error> {
        // reqwest 默认跟随重定向；非 2xx 状态在这里显式报错
        let resp = reqwest::get(self.0)
            .await
            .map_err(|e| anyhow!("failed to reach {}: {}", self.0, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("source {} answered with status {}", self.0, status));
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

struct FileFetcher<'a>(pub(crate) &'a str);

#[async_trait]
impl<'a> Fetch for FileFetcher<'a> {
    type Error = anyhow::Error;

    async fn fetch(&self) -> Result<Vec<u8>, Self::Error> {
        let path = &self.0[7..];
        Ok(fs::read(path).await?)
    }
}
