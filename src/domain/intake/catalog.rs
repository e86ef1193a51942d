//! Step catalogs for each record kind.
//!
//! Catalogs are immutable statics; ordering is significant and the engine
//! only ever reads them.

use super::record_kind::RecordKind;
use super::step::{CatalogQuery, StepDescriptor};
use super::validator::Validator;
use super::value::FieldId;

/// Ordered list of steps collecting one kind of record.
#[derive(Debug, Clone, Copy)]
pub struct StepCatalog {
    kind: RecordKind,
    steps: &'static [StepDescriptor],
}

impl StepCatalog {
    /// Returns the catalog for a record kind.
    pub fn for_kind(kind: RecordKind) -> Self {
        let steps = match kind {
            RecordKind::Asset => ASSET_STEPS,
            RecordKind::Incident => INCIDENT_STEPS,
            RecordKind::Risk => RISK_STEPS,
        };
        Self { kind, steps }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn steps(&self) -> &'static [StepDescriptor] {
        self.steps
    }

    /// Number of steps (`N`).
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&'static StepDescriptor> {
        self.steps.get(index)
    }

    /// Finds the step storing the given field.
    pub fn step_for(&self, field: FieldId) -> Option<&'static StepDescriptor> {
        self.steps.iter().find(|step| step.field == field)
    }
}

const ASSET_TYPES: &[&str] = &["Hardware", "Software", "Data", "Network", "Physical", "Document"];
const CLASSIFICATIONS: &[&str] = &["Public", "Internal", "Confidential", "Restricted"];
const BUSINESS_VALUES: &[&str] = &["Low", "Medium", "High", "Critical"];
const CIA_LEVEL: Validator = Validator::BoundedInteger { lo: 1, hi: 5 };

static ASSET_STEPS: &[StepDescriptor] = &[
    StepDescriptor {
        field: FieldId::new("asset_name"),
        label: "Name",
        prompt: "Let's start with the basics. What's the name of the asset you'd like to register?",
        validator: Validator::MinLength(2),
        error_message: "Asset name must be at least 2 characters long.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("asset_type"),
        label: "Type",
        prompt: "What type of asset is this? Please choose from: Hardware, Software, Data, Network, Physical, or Document.",
        validator: Validator::ClosedEnum(ASSET_TYPES),
        error_message: "Please select a valid asset type: Hardware, Software, Data, Network, Physical, or Document.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("owner"),
        label: "Owner",
        prompt: "Who is the owner or responsible person for this asset? Please provide their name or department.",
        validator: Validator::MinLength(2),
        error_message: "Owner name must be at least 2 characters long.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("custodian"),
        label: "Custodian",
        prompt: "Who is the custodian of this asset? Please provide their name or department.",
        validator: Validator::MinLength(2),
        error_message: "Custodian name must be at least 2 characters long.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("retention_period"),
        label: "Retention Period (years)",
        prompt: "What is the retention period for this asset? Please provide the number of years.",
        validator: Validator::DigitsOnly,
        error_message: "Retention period must be a number.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("disposal_method"),
        label: "Disposal Method",
        prompt: "What is the disposal method for this asset? Please provide the method.",
        validator: Validator::MinLength(2),
        error_message: "Disposal method must be at least 2 characters long.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("ip_address"),
        label: "IP Address",
        prompt: "What is the IP address of this asset? Please provide the IP address.",
        validator: Validator::MinLength(2),
        error_message: "IP address must be at least 2 characters long.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("model_version"),
        label: "Model Version",
        prompt: "What is the model version of this asset? Please provide the version.",
        validator: Validator::MinLength(2),
        error_message: "Model version must be at least 2 characters long.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("classification"),
        label: "Classification",
        prompt: "What's the data classification level? Please choose from: Public, Internal, Confidential, or Restricted.",
        validator: Validator::ClosedEnum(CLASSIFICATIONS),
        error_message: "Please select a valid classification: Public, Internal, Confidential, or Restricted.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("business_value"),
        label: "Business Value",
        prompt: "What's the business value of this asset? Please choose from: Low, Medium, High, or Critical.",
        validator: Validator::ClosedEnum(BUSINESS_VALUES),
        error_message: "Please select a valid business value: Low, Medium, High, or Critical.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("confidentiality_level"),
        label: "Confidentiality",
        prompt: "Now let's set the CIA ratings. What's the confidentiality level? Please enter a number from 1 to 5 (1 = lowest, 5 = highest).",
        validator: CIA_LEVEL,
        error_message: "Please enter a number from 1 to 5.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("integrity_level"),
        label: "Integrity",
        prompt: "What's the integrity level? Please enter a number from 1 to 5 (1 = lowest, 5 = highest).",
        validator: CIA_LEVEL,
        error_message: "Please enter a number from 1 to 5.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("availability_level"),
        label: "Availability",
        prompt: "What's the availability level? Please enter a number from 1 to 5 (1 = lowest, 5 = highest).",
        validator: CIA_LEVEL,
        error_message: "Please enter a number from 1 to 5.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("location"),
        label: "Location",
        prompt: "Where is this asset located? Please provide the physical or logical location.",
        validator: Validator::MinLength(2),
        error_message: "Location must be at least 2 characters long.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("description"),
        label: "Description",
        prompt: "Finally, please provide a brief description of this asset and its purpose.",
        validator: Validator::MinLength(10),
        error_message: "Description must be at least 10 characters long.",
        options_source: None,
    },
];

const INCIDENT_TYPES: &[&str] = &[
    "Security Breach",
    "Data Loss",
    "System Failure",
    "Malware",
    "Phishing",
    "Unauthorized Access",
    "Other",
];
const SEVERITY_LEVELS: &[&str] = &["Low", "Medium", "High", "Critical"];

static INCIDENT_STEPS: &[StepDescriptor] = &[
    StepDescriptor {
        field: FieldId::new("incident_title"),
        label: "Title",
        prompt: "Let's start by getting some basic information. What would you like to title this incident?",
        validator: Validator::MinLength(5),
        error_message: "Please provide a more descriptive title (at least 5 characters).",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("incident_description"),
        label: "Description",
        prompt: "Please provide a detailed description of what happened. Include as much relevant information as possible.",
        validator: Validator::MinLength(10),
        error_message: "Please provide a more detailed description (at least 10 characters).",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("incident_type"),
        label: "Type",
        prompt: "What type of incident is this? Please choose a number or type the incident type:",
        validator: Validator::EnumeratedSelection(INCIDENT_TYPES),
        error_message: "I didn't recognize that incident type.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("severity"),
        label: "Severity",
        prompt: "What's the severity level of this incident?",
        validator: Validator::EnumeratedSelection(SEVERITY_LEVELS),
        error_message: "Please choose a valid severity level.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("reported_by"),
        label: "Reporter",
        prompt: "Who is reporting this incident? Please provide the reporter's name.",
        validator: Validator::MinLength(2),
        error_message: "Please provide a valid reporter name.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("assigned_to"),
        label: "Assigned to",
        prompt: "Who should this incident be assigned to? Please provide the assignee's name.",
        validator: Validator::MinLength(2),
        error_message: "Please provide a valid assignee name.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("detected_date"),
        label: "Detection Date",
        prompt: "When was this incident first detected? Please provide the date and time (e.g., \"2024-01-15 14:30\" or \"today at 2:30 PM\"). You can also type \"unknown\" if not sure.",
        validator: Validator::FlexibleDateTime,
        error_message: "I couldn't parse that date.",
        options_source: None,
    },
];

const RISK_STATUSES: &[&str] = &["Open", "In Progress", "Closed", "Under Review"];
const RISK_TREATMENTS: &[&str] = &["Accept", "Mitigate", "Transfer", "Avoid"];
const REVIEW_FREQUENCIES: &[&str] = &["Monthly", "Quarterly", "Semi-annually", "Annually"];
const RISK_SCORE: Validator = Validator::BoundedInteger { lo: 1, hi: 5 };

static RISK_STEPS: &[StepDescriptor] = &[
    StepDescriptor {
        field: FieldId::new("risk_title"),
        label: "Title",
        prompt: "What is the title of this risk? (e.g., 'Data breach due to weak passwords')",
        validator: Validator::MinLength(3),
        error_message: "Risk title must be at least 3 characters long.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("risk_description"),
        label: "Description",
        prompt: "Please provide a detailed description of this risk:",
        validator: Validator::MinLength(10),
        error_message: "Risk description must be at least 10 characters long.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("category_id"),
        label: "Category",
        prompt: "Please select a risk category by entering its ID:",
        validator: Validator::DynamicIdLookup(CatalogQuery::RiskCategories),
        error_message: "Please select a valid category ID.",
        options_source: Some(CatalogQuery::RiskCategories),
    },
    StepDescriptor {
        field: FieldId::new("asset_id"),
        label: "Asset",
        prompt: "Please select an asset by entering its ID:",
        validator: Validator::DynamicIdLookup(CatalogQuery::InformationAssets),
        error_message: "Please select a valid asset ID.",
        options_source: Some(CatalogQuery::InformationAssets),
    },
    StepDescriptor {
        field: FieldId::new("threat_source"),
        label: "Threat Source",
        prompt: "What is the threat source? (e.g., 'External hackers', 'Malicious insiders', 'Natural disasters')",
        validator: Validator::MinLength(1),
        error_message: "Please describe the threat source.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("vulnerability"),
        label: "Vulnerability",
        prompt: "What vulnerability could be exploited? (e.g., 'Weak password policy', 'Unpatched software')",
        validator: Validator::MinLength(1),
        error_message: "Please describe the vulnerability.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("likelihood_score"),
        label: "Likelihood Score",
        prompt: "What is the likelihood score (1-5)?\n1 = Very Low, 2 = Low, 3 = Medium, 4 = High, 5 = Very High",
        validator: RISK_SCORE,
        error_message: "Score must be between 1 and 5.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("impact_score"),
        label: "Impact Score",
        prompt: "What is the impact score (1-5)?\n1 = Very Low, 2 = Low, 3 = Medium, 4 = High, 5 = Very High",
        validator: RISK_SCORE,
        error_message: "Score must be between 1 and 5.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("risk_owner"),
        label: "Risk Owner",
        prompt: "Who is the risk owner? (person responsible for managing this risk)",
        validator: Validator::MinLength(2),
        error_message: "Risk owner must be at least 2 characters long.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("risk_status"),
        label: "Status",
        prompt: "What is the current risk status?\nOptions: Open, In Progress, Closed, Under Review",
        validator: Validator::ClosedEnum(RISK_STATUSES),
        error_message: "Status must be one of: Open, In Progress, Closed, Under Review.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("identified_date"),
        label: "Identified",
        prompt: "When was this risk identified? (YYYY-MM-DD format)",
        validator: Validator::IsoDate,
        error_message: "Please enter a valid identification date.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("next_review_date"),
        label: "Next Review",
        prompt: "When should this risk be reviewed next? (YYYY-MM-DD format)",
        validator: Validator::IsoDate,
        error_message: "Please enter a valid review date.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("existing_controls"),
        label: "Existing Controls",
        prompt: "What existing controls are in place to mitigate this risk?",
        validator: Validator::MinLength(5),
        error_message: "Existing controls description must be at least 5 characters long.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("risk_treatment"),
        label: "Treatment",
        prompt: "What is the risk treatment strategy?\nOptions: Accept, Mitigate, Transfer, Avoid",
        validator: Validator::ClosedEnum(RISK_TREATMENTS),
        error_message: "Treatment must be one of: Accept, Mitigate, Transfer, Avoid.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("risk_treatment_plan"),
        label: "Treatment Plan",
        prompt: "Please describe the risk treatment plan in detail:",
        validator: Validator::MinLength(10),
        error_message: "Treatment plan must be at least 10 characters long.",
        options_source: None,
    },
    StepDescriptor {
        field: FieldId::new("review_frequency"),
        label: "Review Frequency",
        prompt: "How often should this risk be reviewed?\nOptions: Monthly, Quarterly, Semi-annually, Annually",
        validator: Validator::ClosedEnum(REVIEW_FREQUENCIES),
        error_message: "Frequency must be one of: Monthly, Quarterly, Semi-annually, Annually.",
        options_source: None,
    },
];
