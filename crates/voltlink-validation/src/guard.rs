//! The generic guard instantiated in front of every resource module.

use crate::params::{
    validate_date_range, validate_identifier, validate_pagination,
};
use voltlink_types::{DateRangeFilter, Envelope, Pagination, SearchResult};

/// The capability interface a resource service must satisfy to sit behind
/// the guard. Parameters arriving here have already been validated.
pub trait ResourceModule: Send + Sync {
    type Entity;

    /// Lists entities for a validated window; echoes the window in the
    /// returned page.
    fn list(&self, filter: &DateRangeFilter, page: Pagination) -> SearchResult<Self::Entity>;

    /// Fetches one entity by its validated identifier.
    fn get_by_id(&self, id: &str) -> Option<Self::Entity>;
}

/// Stateless guard translating parameter violations into failure
/// envelopes and valid calls into success envelopes.
///
/// Never clamps or rewrites the caller's window: a structurally valid but
/// out-of-range offset flows through and yields an empty page echoing
/// that offset.
pub struct ModuleGuard<M> {
    module: M,
}

impl<M: ResourceModule> ModuleGuard<M> {
    pub fn new(module: M) -> Self {
        Self { module }
    }

    pub fn list(
        &self,
        filter: DateRangeFilter,
        page: Pagination,
    ) -> Envelope<SearchResult<M::Entity>> {
        if let Err(error) = validate_date_range(&filter) {
            return error.into_envelope();
        }
        if let Err(error) = validate_pagination(page) {
            return error.into_envelope();
        }
        Envelope::success(self.module.list(&filter, page).with_filter(filter))
    }

    pub fn get_by_id(&self, id: &str) -> Envelope<M::Entity> {
        if let Err(error) = validate_identifier(id) {
            return error.into_envelope();
        }
        Envelope::success_opt(self.module.get_by_id(id))
    }
}
