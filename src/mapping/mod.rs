//! Page mapping functions
//!
//! A [`PageMapper`] turns the absolute URLs of the built pages into the
//! shortlinks they should get. Closures can be used directly through
//! [`mapper_fn`] and [`from_fn`]; the built-in mappers in [`builtin`] cover
//! configuration-file driven setups.

pub mod builtin;

use async_trait::async_trait;
use std::future::Future;
use url::Url;

use crate::core::types::PageMapping;

pub use builtin::{CommandMapper, FileMapper, MapperSpec, PathMapper};

/// Error type returned by mapping functions
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type MapperResult = std::result::Result<PageMapping, BoxError>;

#[async_trait]
pub trait PageMapper: Send + Sync {
    async fn page_mapping(&self, pages: Vec<Url>) -> MapperResult;

    /// Mapping for pages that all live under `root`.
    ///
    /// Mappers that derive shortlinks from the page location override this
    /// to work relative to the site root instead of the host.
    async fn site_page_mapping(&self, _root: &Url, pages: Vec<Url>) -> MapperResult {
        self.page_mapping(pages).await
    }
}

/// Mapper backed by a closure returning a future.
pub struct AsyncFnMapper<F>(F);

/// Mapper backed by a plain closure.
pub struct SyncFnMapper<F>(F);

/// Wrap an async closure as a [`PageMapper`].
pub fn mapper_fn<F, Fut>(f: F) -> AsyncFnMapper<F>
where
    F: Fn(Vec<Url>) -> Fut + Send + Sync,
    Fut: Future<Output = MapperResult> + Send + 'static,
{
    AsyncFnMapper(f)
}

/// Wrap a synchronous closure as a [`PageMapper`].
pub fn from_fn<F>(f: F) -> SyncFnMapper<F>
where
    F: Fn(Vec<Url>) -> MapperResult + Send + Sync,
{
    SyncFnMapper(f)
}

#[async_trait]
impl<F, Fut> PageMapper for AsyncFnMapper<F>
where
    F: Fn(Vec<Url>) -> Fut + Send + Sync,
    Fut: Future<Output = MapperResult> + Send + 'static,
{
    async fn page_mapping(&self, pages: Vec<Url>) -> MapperResult {
        (self.0)(pages).await
    }
}

#[async_trait]
impl<F> PageMapper for SyncFnMapper<F>
where
    F: Fn(Vec<Url>) -> MapperResult + Send + Sync,
{
    async fn page_mapping(&self, pages: Vec<Url>) -> MapperResult {
        (self.0)(pages)
    }
}
