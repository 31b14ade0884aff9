//! HTML rendering of the curation and product views.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time templating with
//! automatic escaping. Three views are rendered:
//!
//! - **Gallery**: the catalog grid, every tile carrying its path in
//!   `data-path` so a drag source can read it.
//! - **Album**: the images of one album. References that no longer resolve
//!   to a catalog asset render as a placeholder tile instead of failing the
//!   whole page.
//! - **Product**: a product's images split into exterior and interior
//!   sections.

use crate::album::Album;
use crate::catalog::{CatalogView, ImageAsset};
use crate::model_images::ModelImageSet;
use crate::naming::display_title;
use crate::partition::Partition;
use maud::{DOCTYPE, Markup, html};

const CSS: &str = "\
body{font-family:system-ui,sans-serif;margin:0;padding:1.5rem;background:#fafafa;color:#111}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(180px,1fr));gap:1rem}\
figure{margin:0;background:#fff;border:1px solid #e0e0e0}\
figure img{width:100%;aspect-ratio:4/3;object-fit:cover;display:block}\
figcaption{padding:.5rem;font-size:.85rem}\
figure.missing{display:flex;align-items:center;justify-content:center;aspect-ratio:4/3;color:#999}\
.error{padding:1rem;border:1px solid #c33;color:#c33}";

/// Renders the base HTML document structure
fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS) }
            }
            body {
                (content)
            }
        }
    }
}

fn image_tile(url: &str, caption: &str, path: Option<&str>) -> Markup {
    html! {
        figure draggable=[path.map(|_| "true")] data-path=[path] {
            img src=(url) alt=(caption) loading="lazy";
            figcaption { (caption) }
        }
    }
}

/// Catalog grid with a category heading and an error banner when the
/// catalog could not be loaded.
pub fn render_gallery_page(view: &CatalogView, albums: &[Album]) -> Markup {
    let content = html! {
        h1 { "Gallery" }
        @if let Some(err) = &view.error {
            p.error { "Catalog unavailable: " (err) }
        }
        @if !view.categories.is_empty() {
            p.categories {
                @for (i, category) in view.categories.iter().enumerate() {
                    @if i > 0 { " · " }
                    span.category { (category) }
                }
            }
        }
        @if !albums.is_empty() {
            ul.albums {
                @for album in albums {
                    li.album-target data-album-id=(album.id) {
                        (album.name) " (" (album.images.len()) ")"
                    }
                }
            }
        }
        div.grid {
            @for entry in &view.images {
                (image_tile(&entry.url, &display_title(&entry.name), Some(&entry.path)))
            }
        }
    };
    base_document("Gallery", content)
}

/// One album's images, in album order. Stale references become placeholders.
pub fn render_album_page(album: &Album, assets: &[ImageAsset]) -> Markup {
    let content = html! {
        h1 { (album.name) }
        @if album.images.is_empty() {
            p.empty { "This album is empty." }
        }
        div.grid {
            @for reference in &album.images {
                @match assets.iter().find(|a| a.matches_reference(reference)) {
                    Some(asset) => {
                        (image_tile(&asset.url, &asset.title(), Some(&asset.relative_path)))
                    }
                    None => {
                        figure.missing title=(reference) { "Image unavailable" }
                    }
                }
            }
        }
    };
    base_document(&album.name, content)
}

/// A product's images split into exterior and interior sections.
pub fn render_model_page(set: &ModelImageSet, partition: &Partition) -> Markup {
    let section = |heading: &str, images: &[String]| {
        html! {
            @if !images.is_empty() {
                section {
                    h2 { (heading) }
                    div.grid {
                        @for url in images {
                            (image_tile(url, &caption_for(url), None))
                        }
                    }
                }
            }
        }
    };
    let content = html! {
        h1 { (set.slug) }
        @if set.images.is_empty() {
            p.empty { "No images available." }
        }
        (section("Exterior", &partition.exterior))
        (section("Interior", &partition.interior))
    };
    base_document(&set.slug, content)
}

fn caption_for(url: &str) -> String {
    display_title(url.rsplit('/').next().unwrap_or(url))
}
