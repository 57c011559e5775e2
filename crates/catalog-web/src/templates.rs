//! Askama template definitions and the view models they render.

use askama::Template;
use catalog_router::{Location, Route};
use catalog_types::{format_date, format_file_size, Asset, Category, Pagination, SortOrder};
use serde::Serialize;

/// Footer column split: the first categories get their own column.
const FOOTER_PRIMARY: usize = 3;

/// Pages shown on each side of the current one in the pager.
const PAGER_RADIUS: u32 = 2;

/// Link to a category page.
#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub name: String,
    pub href: String,
}

impl From<&Category> for NavLink {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            href: Route::category(&category.slug).href(),
        }
    }
}

/// Header and footer content shared by every page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    pub nav: Vec<NavLink>,
    pub footer_primary: Vec<NavLink>,
    pub footer_more: Vec<NavLink>,
    /// Current search text, echoed into the header form.
    pub search: String,
}

impl Layout {
    pub fn new(categories: &[Category]) -> Self {
        let nav: Vec<NavLink> = categories.iter().map(NavLink::from).collect();
        let split = nav.len().min(FOOTER_PRIMARY);
        Self {
            footer_primary: nav[..split].to_vec(),
            footer_more: nav[split..].to_vec(),
            nav,
            search: String::new(),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }
}

/// Asset tile for grids and prompt lists.
#[derive(Debug, Clone, Serialize)]
pub struct AssetCard {
    pub title: String,
    pub href: String,
    pub thumbnail_url: String,
    pub description: Option<String>,
    /// Text copied by the prompt list's copy button.
    pub prompt: String,
    pub downloads: u64,
    pub views: u64,
}

impl From<&Asset> for AssetCard {
    fn from(asset: &Asset) -> Self {
        Self {
            title: asset.title.clone(),
            href: Route::asset(&asset.id).href(),
            thumbnail_url: asset.thumbnail_url.clone(),
            description: asset.description.clone().filter(|d| !d.is_empty()),
            prompt: asset.prompt_text().to_string(),
            downloads: asset.downloads(),
            views: asset.views(),
        }
    }
}

pub fn asset_cards(assets: &[Asset]) -> Vec<AssetCard> {
    assets.iter().map(AssetCard::from).collect()
}

/// One pager entry.
#[derive(Debug, Clone, Serialize)]
pub struct PageLink {
    pub number: u32,
    pub href: String,
    pub current: bool,
}

/// Pager below a listing.
#[derive(Debug, Clone, Serialize)]
pub struct PagerView {
    pub previous: Option<String>,
    pub next: Option<String>,
    pub pages: Vec<PageLink>,
}

impl PagerView {
    /// Builds the pager, or `None` when everything fits on one page.
    ///
    /// `base` carries the listing's other query parameters; `page` is
    /// added to it for each link.
    pub fn build(pagination: &Pagination, base: &Location) -> Option<Self> {
        if !pagination.is_needed() {
            return None;
        }
        let link = |page: u32| base.clone().with_query("page", page.to_string()).href();
        let current = pagination.page();

        Some(Self {
            previous: pagination.has_previous().then(|| link(current - 1)),
            next: pagination.has_next().then(|| link(current + 1)),
            pages: pagination
                .window(PAGER_RADIUS)
                .map(|number| PageLink {
                    number,
                    href: link(number),
                    current: number == current,
                })
                .collect(),
        })
    }
}

/// Category block on the home page.
#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub name: String,
    pub description: String,
    pub href: String,
    pub prompt_collection: bool,
    pub assets: Vec<AssetCard>,
}

impl SectionView {
    pub fn new(category: &Category, assets: &[Asset]) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description_or_empty().to_string(),
            href: Route::category(&category.slug).href(),
            prompt_collection: category.is_prompt_collection(),
            assets: asset_cards(assets),
        }
    }
}

/// Full asset record as shown on its detail page.
#[derive(Debug, Clone, Serialize)]
pub struct AssetView {
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub thumbnail_url: String,
    pub download_action: String,
    pub file_type: Option<String>,
    pub downloads: u64,
    pub views: u64,
    pub created: Option<String>,
    pub size: Option<String>,
    pub dimensions: Option<String>,
    pub tags: Vec<String>,
}

impl From<&Asset> for AssetView {
    fn from(asset: &Asset) -> Self {
        Self {
            title: asset.title.clone(),
            description: asset.description.clone().filter(|d| !d.is_empty()),
            file_url: asset.file_url.clone(),
            thumbnail_url: asset.thumbnail_url.clone(),
            download_action: format!("/downloads/{}", asset.id),
            file_type: asset.file_type.clone(),
            downloads: asset.downloads(),
            views: asset.views(),
            created: asset.created_at.as_ref().map(format_date),
            size: asset.file_size.map(format_file_size),
            dimensions: asset.dimensions().map(|(w, h)| format!("{w} × {h}")),
            tags: asset.tag_list().to_vec(),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub sections: Vec<SectionView>,
}

#[derive(Template)]
#[template(path = "category.html")]
pub struct CategoryTemplate {
    pub layout: Layout,
    pub name: String,
    pub description: String,
    pub total: u64,
    pub sort_latest: bool,
    pub latest_href: String,
    pub trending_href: String,
    pub prompt_collection: bool,
    pub assets: Vec<AssetCard>,
    pub pager: Option<PagerView>,
}

impl CategoryTemplate {
    /// Sort toggle links; switching sort starts again at page 1.
    pub fn sort_hrefs(category: &Category) -> (String, String) {
        let base = Location::new(Route::category(&category.slug).href());
        let href = |order: SortOrder| {
            base.clone()
                .with_query("sort", order.as_str())
                .href()
        };
        (href(SortOrder::Latest), href(SortOrder::Trending))
    }
}

#[derive(Template)]
#[template(path = "asset.html")]
pub struct AssetTemplate {
    pub layout: Layout,
    pub asset: AssetView,
    pub related: Vec<AssetCard>,
}

#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub layout: Layout,
    pub query: String,
    pub total: u64,
    pub assets: Vec<AssetCard>,
    pub pager: Option<PagerView>,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub layout: Layout,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub layout: Layout,
    pub status: u16,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories(n: usize) -> Vec<Category> {
        (0..n)
            .map(|i| Category::new(format!("c{i}"), format!("Cat {i}"), format!("cat-{i}")))
            .collect()
    }

    #[test]
    fn test_layout_splits_footer() {
        let layout = Layout::new(&categories(5));
        assert_eq!(layout.nav.len(), 5);
        assert_eq!(layout.footer_primary.len(), 3);
        assert_eq!(layout.footer_more.len(), 2);
        assert_eq!(layout.footer_more[0].href, "/category/cat-3");

        let layout = Layout::new(&categories(2));
        assert_eq!(layout.footer_primary.len(), 2);
        assert!(layout.footer_more.is_empty());
    }

    #[test]
    fn test_pager_hidden_for_single_page() {
        let base = Location::new("/search").with_query("q", "cat");
        assert!(PagerView::build(&Pagination::new(1, 20, 20), &base).is_none());
        assert!(PagerView::build(&Pagination::new(1, 20, 0), &base).is_none());
    }

    #[test]
    fn test_pager_links_keep_query() {
        let base = Location::new("/search").with_query("q", "blue sky");
        let pager = PagerView::build(&Pagination::new(2, 20, 45), &base).unwrap();

        assert_eq!(pager.previous.as_deref(), Some("/search?page=1&q=blue+sky"));
        assert!(pager.next.is_some());
        assert_eq!(pager.pages.len(), 3);
        assert!(pager.pages[1].current);
    }

    #[test]
    fn test_last_page_has_no_next() {
        let base = Location::new("/category/icons");
        let pager = PagerView::build(&Pagination::new(3, 20, 45), &base).unwrap();
        assert!(pager.next.is_none());
        assert_eq!(pager.previous.as_deref(), Some("/category/icons?page=2"));
    }

    #[test]
    fn test_sort_hrefs_reset_page() {
        let category = Category::new("c1", "Icons", "icons");
        let (latest, trending) = CategoryTemplate::sort_hrefs(&category);
        assert_eq!(latest, "/category/icons?sort=latest");
        assert_eq!(trending, "/category/icons?sort=trending");
    }

    #[test]
    fn test_asset_view_formats_details() {
        let mut asset = Asset::new("a1", "Dunes", "https://f/d.png", "https://t/d.png");
        asset.file_size = Some(2048);
        asset.width = Some(1920);
        asset.height = Some(1080);

        let view = AssetView::from(&asset);
        assert_eq!(view.size.as_deref(), Some("2.0 KB"));
        assert_eq!(view.dimensions.as_deref(), Some("1920 × 1080"));
        assert_eq!(view.download_action, "/downloads/a1");
        assert!(view.created.is_none());
    }

    #[test]
    fn test_error_page_escapes_message() {
        let page = ErrorTemplate {
            layout: Layout::default(),
            status: 404,
            message: "<script>".into(),
        };
        let html = page.render().unwrap();
        assert!(html.contains("&lt;script&gt;"));
    }
}
