use tracing::{debug, info};

use super::{enter, failed, PageError};
use crate::api::ApiError;
use crate::models::{Pricing, Tier};
use crate::routes::Route;
use crate::state::AppState;
use crate::utils::notifier::Toast;

pub const PRICING_FETCH_FAILED: &str = "Failed to fetch pricing";
pub const PRICING_UNAVAILABLE: &str = "Pricing data is not available.";
pub const PRICING_UPDATED: &str = "Pricing updated successfully";
pub const PRICING_UPDATE_FAILED: &str = "Failed to update pricing";

#[derive(Debug, Clone, PartialEq)]
pub enum PricingView {
    Loading,
    /// The fetch failed; carries the message shown in place of the plans.
    Failed(String),
    /// The backend answered without both tiers.
    Unavailable,
    Plans(Pricing),
}

/// The public pricing page.
pub struct PricingPage {
    state: AppState,
    view: PricingView,
}

impl PricingPage {
    pub fn open(state: &AppState) -> Result<Self, PageError> {
        enter(state, Route::Pricing)?;
        Ok(PricingPage {
            state: state.clone(),
            view: PricingView::Loading,
        })
    }

    pub fn view(&self) -> &PricingView {
        &self.view
    }

    pub async fn load(&mut self) -> &PricingView {
        self.view = match self.state.api.pricing().await {
            Ok(document) => match document.complete() {
                Some(pricing) => PricingView::Plans(pricing),
                None => PricingView::Unavailable,
            },
            Err(e) => {
                failed(&self.state, e, PRICING_FETCH_FAILED);
                PricingView::Failed(PRICING_FETCH_FAILED.to_string())
            }
        };
        &self.view
    }

    /// Where each plan's button leads: admins edit the plans, everyone else submits work.
    pub fn call_to_action(&self) -> Route {
        if self.state.session().is_admin() {
            Route::EditPricing
        } else {
            Route::SubmitAssignment
        }
    }

    /// Price of `pages` pages on `tier`, once the plans are loaded.
    pub fn quote(&self, tier: Tier, pages: u32) -> Option<f64> {
        match &self.view {
            PricingView::Plans(pricing) => Some(pricing.tier(tier).quote(pages)),
            _ => None,
        }
    }
}

/// Result of saving the pricing form. The page moves on to `next` either way.
#[derive(Debug)]
pub struct SaveOutcome {
    pub next: Route,
    pub result: Result<(), PageError>,
}

/// The administrators' pricing editor.
pub struct EditPricing {
    state: AppState,
    pricing: Pricing,
}

impl EditPricing {
    /// Non-admins get nothing rendered.
    pub fn open(state: &AppState) -> Result<Self, PageError> {
        let session = enter(state, Route::EditPricing)?;
        if !session.is_admin() {
            return Err(PageError::Forbidden);
        }
        Ok(EditPricing {
            state: state.clone(),
            pricing: Pricing::default(),
        })
    }

    /// Loads the current plans into the form.
    pub async fn load(&mut self) -> Result<&Pricing, PageError> {
        let fetched = match self.state.api.pricing().await {
            Ok(document) => document
                .complete()
                .ok_or(ApiError::Incomplete("both pricing tiers")),
            Err(e) => Err(e),
        };
        self.pricing = fetched.map_err(|e| failed(&self.state, e, PRICING_FETCH_FAILED))?;
        Ok(&self.pricing)
    }

    pub fn pricing(&self) -> &Pricing {
        &self.pricing
    }

    pub fn set_price(&mut self, tier: Tier, price: f64) {
        self.pricing.tier_mut(tier).price = price;
    }

    pub fn set_description(&mut self, tier: Tier, description: &str) {
        self.pricing.tier_mut(tier).description = description.to_string();
    }

    pub fn set_page_range(&mut self, tier: Tier, page_range: &str) {
        self.pricing.tier_mut(tier).page_range = page_range.to_string();
    }

    /// Features are edited as one comma separated line.
    pub fn set_features(&mut self, tier: Tier, csv: &str) {
        self.pricing.tier_mut(tier).set_features_from_csv(csv);
        debug!("{} features now {:?}", tier, self.pricing.tier(tier).features);
    }

    /// PUTs the whole document, then returns to the pricing page whatever happened.
    pub async fn save(&self) -> SaveOutcome {
        let token = self.state.session.token();
        let result = match self
            .state
            .api
            .update_pricing(token.as_deref(), &self.pricing)
            .await
        {
            Ok(()) => {
                info!(
                    event_name = "pricing.updated",
                    event_domain = "pricing",
                    basic = self.pricing.basic.price,
                    standard = self.pricing.standard.price,
                    "pricing updated"
                );
                self.state.notifier.notify(Toast::success(PRICING_UPDATED));
                Ok(())
            }
            Err(e) => Err(failed(&self.state, e, PRICING_UPDATE_FAILED)),
        };
        SaveOutcome {
            next: Route::Pricing,
            result,
        }
    }
}
