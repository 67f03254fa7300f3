// ── API → domain conversions ──

use storefront_api::{ProductBody, ProductResponse, RatingResponse};

use crate::model::{Product, ProductPayload, Rating};

impl From<ProductResponse> for Product {
    fn from(resp: ProductResponse) -> Self {
        Product {
            id: resp.id,
            title: resp.title,
            price: resp.price,
            description: resp.description,
            category: resp.category,
            image: resp.image,
            rating: resp.rating.map(Rating::from),
        }
    }
}

impl From<RatingResponse> for Rating {
    fn from(r: RatingResponse) -> Self {
        Rating {
            rate: r.rate,
            count: r.count,
        }
    }
}

impl From<&ProductPayload> for ProductBody {
    fn from(p: &ProductPayload) -> Self {
        ProductBody {
            title: p.title.clone(),
            price: p.price,
            description: p.description.clone(),
            category: p.category.clone(),
            image: p.image.clone(),
        }
    }
}
