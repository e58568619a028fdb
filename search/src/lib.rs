/*!
# Catalog Navigation Search

Live filtering for a grouped catalog navigation:
- **Index loading** of `search.json` in the background, once
- **Fuzzy matching** of records by name, qualities and group
- **Substring fallback** whenever the index is missing or a query fails
- **Accordion sync** so groups with hits open and everything else closes

## Pipeline

```text
input event
  └─> trim
        ├─> empty ─────────────> reset (all visible, all collapsed)
        └─> non-empty
              ├─> index ready ──> match set by reference path
              └─> otherwise ────> substring over name / qualities
                    └─> surface parents of visible subordinates
                          └─> accordion sync
```
*/

pub mod accordion;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod matcher;
pub mod proto;
pub mod reference;
pub mod render;
pub mod theme;
pub mod tree;
pub mod widget;

pub use catalog::Catalog;
pub use config::MatcherOptions;
pub use config::SearchConfig;
pub use config::SearchKey;
pub use error::CatalogError;
pub use error::ConfigError;
pub use error::IndexLoadError;
pub use error::MalformedNodeError;
pub use error::MatchError;
pub use filter::FallbackReason;
pub use filter::FilterMode;
pub use filter::FilterOutcome;
pub use loader::IndexLoader;
pub use loader::IndexSource;
pub use loader::load_index;
pub use matcher::FuzzyMatcher;
pub use matcher::MatchSet;
pub use matcher::RecordMatcher;
pub use proto::CatalogRecord;
pub use proto::SearchIndex;
pub use render::NavProjection;
pub use theme::Theme;
pub use tree::NavTree;
pub use widget::IndexState;
pub use widget::SearchWidget;
