use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::domain::{Application, ApplicationState, Fund, LegalEntity, Review};
use crate::config::DocumentConfig;

const IN_REVIEW_PREFIX: &str = "Your application has been placed in review";
const ADDRESS_VERIFICATION: &str = " pending outstanding address verification for FICA purposes.";
const BANK_VERIFICATION: &str = " pending outstanding bank account verification.";
const SUSPICIOUS_BEHAVIOUR: &str =
    " because of suspicious account behaviour. Please contact support ASAP.";

/// Templates with a defined rendering, one per renderable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DocumentTemplate {
    PendingApplication,
    ActivatedApplication,
    InReviewApplication,
}

impl DocumentTemplate {
    pub const fn for_state(state: ApplicationState) -> Option<Self> {
        match state {
            ApplicationState::Pending => Some(Self::PendingApplication),
            ApplicationState::Activated => Some(Self::ActivatedApplication),
            ApplicationState::InReview => Some(Self::InReviewApplication),
            ApplicationState::Declined | ApplicationState::Closed => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::PendingApplication => "PendingApplication",
            Self::ActivatedApplication => "ActivatedApplication",
            Self::InReviewApplication => "InReviewApplication",
        }
    }
}

/// Fields shared by every application document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationSummary {
    pub reference_number: String,
    pub state: &'static str,
    pub full_name: String,
    pub applied_on: NaiveDate,
    pub support_email: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSection {
    pub legal_entity: Option<LegalEntity>,
    pub portfolio_funds: Vec<Fund>,
    pub portfolio_total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingApplicationView {
    #[serde(flatten)]
    pub summary: ApplicationSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivatedApplicationView {
    #[serde(flatten)]
    pub summary: ApplicationSummary,
    #[serde(flatten)]
    pub portfolio: PortfolioSection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InReviewApplicationView {
    #[serde(flatten)]
    pub summary: ApplicationSummary,
    #[serde(flatten)]
    pub portfolio: PortfolioSection,
    pub in_review_message: String,
    pub in_review_information: Option<Review>,
}

/// View model handed to the template renderer. Serializes as the inner shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApplicationView {
    Pending(PendingApplicationView),
    Activated(ActivatedApplicationView),
    InReview(InReviewApplicationView),
}

impl ApplicationView {
    /// Builds the view for the application's current state, or `None` when the state has no
    /// defined rendering.
    pub fn build(application: &Application, config: &DocumentConfig) -> Option<Self> {
        let summary = ApplicationSummary {
            reference_number: application.reference_number.clone(),
            state: application.state.description(),
            full_name: application.person.full_name(),
            applied_on: application.date,
            support_email: config.support_email.clone(),
            signature: config.signature.clone(),
        };

        let view = match DocumentTemplate::for_state(application.state)? {
            DocumentTemplate::PendingApplication => {
                Self::Pending(PendingApplicationView { summary })
            }
            DocumentTemplate::ActivatedApplication => {
                Self::Activated(ActivatedApplicationView {
                    summary,
                    portfolio: portfolio_section(application, config.tax_rate),
                })
            }
            DocumentTemplate::InReviewApplication => {
                let review = application.current_review.clone();
                let reason = review.as_ref().and_then(|review| review.reason.as_deref());
                Self::InReview(InReviewApplicationView {
                    summary,
                    portfolio: portfolio_section(application, config.tax_rate),
                    in_review_message: review_message(reason),
                    in_review_information: review,
                })
            }
        };
        Some(view)
    }

    pub const fn template(&self) -> DocumentTemplate {
        match self {
            Self::Pending(_) => DocumentTemplate::PendingApplication,
            Self::Activated(_) => DocumentTemplate::ActivatedApplication,
            Self::InReview(_) => DocumentTemplate::InReviewApplication,
        }
    }

    pub fn summary(&self) -> &ApplicationSummary {
        match self {
            Self::Pending(view) => &view.summary,
            Self::Activated(view) => &view.summary,
            Self::InReview(view) => &view.summary,
        }
    }

    pub fn portfolio(&self) -> Option<&PortfolioSection> {
        match self {
            Self::Pending(_) => None,
            Self::Activated(view) => Some(&view.portfolio),
            Self::InReview(view) => Some(&view.portfolio),
        }
    }
}

fn portfolio_section(application: &Application, tax_rate: Decimal) -> PortfolioSection {
    let legal_entity = if application.is_legal_entity {
        application.legal_entity.clone()
    } else {
        None
    };

    PortfolioSection {
        legal_entity,
        portfolio_funds: application.funds().cloned().collect(),
        portfolio_total_amount: portfolio_total(application.funds(), tax_rate),
    }
}

/// Sum of `(amount - fees) * tax_rate` over the given funds.
pub fn portfolio_total<'a>(
    funds: impl IntoIterator<Item = &'a Fund>,
    tax_rate: Decimal,
) -> Decimal {
    funds
        .into_iter()
        .map(|fund| (fund.amount - fund.fees) * tax_rate)
        .sum()
}

/// Message explaining why an application is held for review. Matching is case-sensitive and
/// the first matching keyword wins.
pub fn review_message(reason: Option<&str>) -> String {
    let suffix = match reason {
        Some(reason) if reason.contains("address") => ADDRESS_VERIFICATION,
        Some(reason) if reason.contains("bank") => BANK_VERIFICATION,
        _ => SUSPICIOUS_BEHAVIOUR,
    };
    format!("{IN_REVIEW_PREFIX}{suffix}")
}
