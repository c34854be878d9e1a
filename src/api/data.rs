// Raw Reverb wire shapes. Reference fields live under nested "_links" objects.
use serde::Deserialize;

use crate::analyzer::DealQuery;
use crate::model::{Category, EstimatedValue, Listing, PriceGuide};
use crate::utils::parse_datetime;

#[derive(Debug, Deserialize)]
pub struct LinkRef {
    pub href: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryLinks {
    pub image: LinkRef,
}

#[derive(Debug, Deserialize)]
pub struct RawCategory {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "_links")]
    pub links: CategoryLinks,
}

impl RawCategory {
    pub fn into_category(self) -> Category {
        Category {
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            image_url: self.links.image.href,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<RawCategory>,
}

#[derive(Debug, Deserialize)]
pub struct RawEstimatedValue {
    pub bottom_price: f64,
    pub top_price: f64,
}

#[derive(Debug, Deserialize)]
pub struct PriceGuideLinks {
    #[serde(rename = "self")]
    pub own: LinkRef,
}

#[derive(Debug, Deserialize)]
pub struct RawPriceGuide {
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub finish: String,
    #[serde(default)]
    pub year: String,
    pub estimated_value: Option<RawEstimatedValue>,
    #[serde(rename = "_links")]
    pub links: PriceGuideLinks,
}

impl RawPriceGuide {
    pub fn into_price_guide(self) -> PriceGuide {
        PriceGuide {
            identifier: self.links.own.href,
            make: self.make,
            model: self.model,
            finish: self.finish,
            year: self.year,
            estimated_value: self.estimated_value.map(|value| EstimatedValue {
                bottom_price: value.bottom_price,
                top_price: value.top_price,
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageLinks {
    pub next: Option<LinkRef>,
}

#[derive(Debug, Deserialize)]
pub struct PriceGuidesResponse {
    pub price_guides: Vec<RawPriceGuide>,
    #[serde(rename = "_links", default)]
    pub links: PageLinks,
}

impl PriceGuidesResponse {
    pub fn into_page(self) -> PriceGuidePage {
        PriceGuidePage {
            guides: self
                .price_guides
                .into_iter()
                .map(RawPriceGuide::into_price_guide)
                .collect(),
            next: self.links.next.map(|link| link.href),
        }
    }
}

/// One page of price guides plus the cursor to the next one.
#[derive(Debug, Clone)]
pub struct PriceGuidePage {
    pub guides: Vec<PriceGuide>,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PhotoLinks {
    pub thumbnail: LinkRef,
}

#[derive(Debug, Deserialize)]
pub struct RawPhoto {
    #[serde(rename = "_links")]
    pub links: PhotoLinks,
}

#[derive(Debug, Deserialize)]
pub struct ListingLinks {
    pub web: LinkRef,
}

#[derive(Debug, Deserialize)]
pub struct RawListing {
    pub title: String,
    pub shop_name: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub condition: String,
    pub price: f64,
    #[serde(default)]
    pub photos: Vec<RawPhoto>,
    #[serde(rename = "_links")]
    pub links: ListingLinks,
}

impl RawListing {
    /// Ties the listing back to the price guide whose query produced it.
    pub fn into_listing(self, query: &DealQuery) -> Listing {
        let thumbnail_url = self
            .photos
            .into_iter()
            .next()
            .map(|photo| photo.links.thumbnail.href);
        Listing {
            link: self.links.web.href,
            title: self.title,
            shop: self.shop_name,
            created_at: parse_datetime(&self.created_at),
            condition: self.condition,
            price: self.price,
            thumbnail_url,
            price_guide_link: query.identifier.clone(),
            bottom_price: query.bottom_price,
            top_price: query.top_price,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListingsResponse {
    pub listings: Vec<RawListing>,
}
