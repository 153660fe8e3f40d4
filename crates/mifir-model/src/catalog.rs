//! Standard MiFIR RTS 22 field catalog for `auth.016.001.01` reporting.
//!
//! The catalog is static configuration data: every target regulatory
//! field with its output path, declared type, requirement level, and
//! (for enums) the admissible value set. Resolution and report assembly
//! both read it; nothing mutates it after construction.

use serde::{Deserialize, Serialize};

use crate::enums::{FieldType, Requirement};

/// A single target regulatory field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Unique field key (e.g., `transaction_id`).
    pub name: String,
    /// Structural location in the output document (e.g., `Buyr/AcctOwnr/Id/Org/LEI`).
    pub target_path: String,
    pub field_type: FieldType,
    pub requirement: Requirement,
    pub description: String,
    pub example_value: String,
    /// Admissible values, for enum-typed fields.
    pub enum_values: Option<Vec<String>>,
    pub notes: String,
}

impl FieldSpec {
    fn new(
        name: &str,
        target_path: &str,
        field_type: FieldType,
        requirement: Requirement,
        description: &str,
        example_value: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            target_path: target_path.to_string(),
            field_type,
            requirement,
            description: description.to_string(),
            example_value: example_value.to_string(),
            enum_values: None,
            notes: String::new(),
        }
    }

    fn with_enum_values(mut self, values: &[&str]) -> Self {
        self.enum_values = Some(values.iter().map(|v| (*v).to_string()).collect());
        self
    }

    fn with_notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_string();
        self
    }
}

/// The fixed standard field catalog, in insertion order.
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    fields: Vec<FieldSpec>,
}

impl FieldCatalog {
    /// Builds the RTS 22 transaction-reporting field set.
    pub fn standard() -> Self {
        use FieldType as T;
        use Requirement as R;

        let fields = vec![
            // Reporting/envelope fields
            FieldSpec::new(
                "reporting_party_lei",
                "RptgPrty/LEI",
                T::String,
                R::Required,
                "Reporting party LEI (your firm)",
                "2138001ME4Z9Z8DZNS52",
            )
            .with_notes("Your firm's LEI code"),
            FieldSpec::new(
                "report_action_type",
                "New/Crrctn/Cxl",
                T::Enum,
                R::Optional,
                "Report action type",
                "New",
            )
            .with_enum_values(&["New", "Correction", "Cancel"])
            .with_notes("Defaults to 'New' for new reports"),
            FieldSpec::new(
                "tech_record_id",
                "TechRcrdId",
                T::String,
                R::Optional,
                "Unique technical record ID",
                "TXN_001_20250819",
            )
            .with_notes("Auto-generated if not provided"),
            // Instrument identification
            FieldSpec::new(
                "instrument_isin",
                "FinInstrmId/Id/ISIN",
                T::String,
                R::Required,
                "Financial instrument ISIN from ANNA DSB",
                "US0231351067",
            )
            .with_notes("Must be the DSB ISIN for the derivative, not a venue ticker"),
            FieldSpec::new(
                "instrument_cfi",
                "FinInstrmId/CFI",
                T::String,
                R::Optional,
                "CFI classification code",
                "FXXXXX",
            )
            .with_notes("6-character CFI code, can be provided as a constant"),
            // Execution details
            FieldSpec::new(
                "execution_datetime",
                "ExctnDtTm",
                T::Datetime,
                R::Required,
                "Execution date and time (UTC with milliseconds)",
                "2025-08-19T22:23:00.300Z",
            )
            .with_notes("Full ISO 8601 UTC timestamp with milliseconds"),
            FieldSpec::new(
                "trade_datetime",
                "TradDtTm",
                T::Datetime,
                R::Required,
                "Trade date and time (UTC)",
                "2025-08-19T22:23:00.300Z",
            )
            .with_notes("Full ISO 8601 UTC timestamp with milliseconds"),
            FieldSpec::new(
                "settlement_date",
                "SttlmDt",
                T::String,
                R::Conditional,
                "Settlement date (if applicable)",
                "2025-08-21",
            )
            .with_notes("Format: YYYY-MM-DD, if applicable to the product"),
            FieldSpec::new(
                "trading_venue",
                "TradgVn/MIC",
                T::Enum,
                R::Optional,
                "Trading venue MIC code",
                "XOFF",
            )
            .with_enum_values(&["XOFF", "SINT", "XXXX"])
            .with_notes("Defaults to XOFF (OTC) for off-venue trades"),
            FieldSpec::new(
                "trading_capacity",
                "TradgCpcty",
                T::Enum,
                R::Optional,
                "Trading capacity",
                "PRIN",
            )
            .with_enum_values(&["PRIN", "AGEN", "MTCH"])
            .with_notes("Defaults to PRIN (Principal)"),
            FieldSpec::new(
                "price_amount",
                "Pric/Amt",
                T::Decimal,
                R::Required,
                "Transaction price",
                "144.01",
            )
            .with_notes("Price in contract currency"),
            FieldSpec::new(
                "price_currency",
                "Pric/Amt/@Ccy",
                T::String,
                R::Optional,
                "Price currency",
                "USD",
            )
            .with_notes("Defaults to USD"),
            FieldSpec::new(
                "quantity",
                "Qty",
                T::Decimal,
                R::Required,
                "Transaction quantity",
                "0.01",
            )
            .with_notes("Quantity in contract units"),
            // Buyer fields
            FieldSpec::new(
                "buyer_lei",
                "Buyr/AcctOwnr/Id/Org/LEI",
                T::String,
                R::Conditional,
                "Buyer LEI (if legal entity)",
                "506700N3EE6U50944T62",
            )
            .with_notes("Use LEI for legal entities, national ID for natural persons"),
            FieldSpec::new(
                "buyer_national_id",
                "Buyr/AcctOwnr/Id/Prsn/Othr/Id",
                T::String,
                R::Conditional,
                "Buyer national ID (if natural person)",
                "BE592344987958",
            )
            .with_notes("Use when buyer is a natural person"),
            FieldSpec::new(
                "buyer_first_name",
                "Buyr/AcctOwnr/Id/Prsn/FrstNm",
                T::String,
                R::Conditional,
                "Buyer first name (if natural person)",
                "MATHIEU MANUEL M",
            ),
            FieldSpec::new(
                "buyer_last_name",
                "Buyr/AcctOwnr/Id/Prsn/Nm",
                T::String,
                R::Conditional,
                "Buyer last name (if natural person)",
                "DE KONINCK",
            ),
            FieldSpec::new(
                "buyer_birth_date",
                "Buyr/AcctOwnr/Id/Prsn/BirthDt",
                T::String,
                R::Conditional,
                "Buyer birth date (if natural person)",
                "1994-08-31",
            )
            .with_notes("Format: YYYY-MM-DD"),
            FieldSpec::new(
                "buyer_country",
                "Buyr/AcctOwnr/CtryOfBrnch",
                T::String,
                R::Conditional,
                "Buyer country of branch",
                "CY",
            )
            .with_notes("ISO 3166-1 alpha-2 country code"),
            // Seller fields
            FieldSpec::new(
                "seller_lei",
                "Sellr/AcctOwnr/Id/Org/LEI",
                T::String,
                R::Conditional,
                "Seller LEI (if legal entity)",
                "506700N3EE6U50944T62",
            ),
            FieldSpec::new(
                "seller_national_id",
                "Sellr/AcctOwnr/Id/Prsn/Othr/Id",
                T::String,
                R::Conditional,
                "Seller national ID (if natural person)",
                "BE592344987958",
            ),
            FieldSpec::new(
                "seller_first_name",
                "Sellr/AcctOwnr/Id/Prsn/FrstNm",
                T::String,
                R::Conditional,
                "Seller first name (if natural person)",
                "SEBASTIAN",
            ),
            FieldSpec::new(
                "seller_last_name",
                "Sellr/AcctOwnr/Id/Prsn/Nm",
                T::String,
                R::Conditional,
                "Seller last name (if natural person)",
                "NEVADO",
            ),
            FieldSpec::new(
                "seller_birth_date",
                "Sellr/AcctOwnr/Id/Prsn/BirthDt",
                T::String,
                R::Conditional,
                "Seller birth date (if natural person)",
                "1978-10-31",
            ),
            FieldSpec::new(
                "seller_country",
                "Sellr/AcctOwnr/CtryOfBrnch",
                T::String,
                R::Conditional,
                "Seller country of branch",
                "CY",
            ),
            // Decision-maker fields (RTS 22 core controls)
            FieldSpec::new(
                "investment_decision_person",
                "Buyr/DcsnMakr/Prsn/Id",
                T::String,
                R::Conditional,
                "Investment decision maker (natural person national ID)",
                "BE592344987958",
            )
            .with_notes("National ID of the person who made the investment decision"),
            FieldSpec::new(
                "investment_decision_algo",
                "Buyr/DcsnMakr/Algo/Id",
                T::String,
                R::Conditional,
                "Investment decision algorithm ID",
                "ALGO_001",
            )
            .with_notes("Algorithm ID if the investment decision was algorithmic"),
            FieldSpec::new(
                "execution_decision_person",
                "ExctnWthnFirm/Prsn/Id",
                T::String,
                R::Conditional,
                "Execution decision maker (natural person national ID)",
                "BE592344987958",
            )
            .with_notes("National ID of the person who made the execution decision"),
            FieldSpec::new(
                "execution_decision_algo",
                "ExctnWthnFirm/Algo/Id",
                T::String,
                R::Conditional,
                "Execution decision algorithm ID",
                "ALGO_002",
            )
            .with_notes("Algorithm ID if the execution decision was algorithmic"),
            // Flags and indicators
            FieldSpec::new(
                "short_sale_indicator",
                "ShrtSellgInd",
                T::Enum,
                R::Optional,
                "Short sale indicator",
                "NSHO",
            )
            .with_enum_values(&["SESH", "SSEX", "SELL", "NSHO"])
            .with_notes("Defaults to NSHO (not applicable)"),
            FieldSpec::new(
                "commodity_derivative_indicator",
                "CmmdtyDerivInd",
                T::Enum,
                R::Optional,
                "Commodity derivative indicator",
                "N",
            )
            .with_enum_values(&["Y", "N"])
            .with_notes("Defaults to N (not a commodity derivative)"),
            FieldSpec::new(
                "clearing_indicator",
                "ClrngInd",
                T::Enum,
                R::Optional,
                "Clearing indicator",
                "N",
            )
            .with_enum_values(&["Y", "N"])
            .with_notes("Defaults to N (not cleared)"),
            FieldSpec::new(
                "securities_financing_indicator",
                "SctiesFincgTxInd",
                T::Enum,
                R::Optional,
                "Securities financing transaction indicator",
                "N",
            )
            .with_enum_values(&["Y", "N"])
            .with_notes("Defaults to N (not SFT)"),
            // Firm/branch context
            FieldSpec::new(
                "country_of_branch",
                "CtryOfBrnch",
                T::String,
                R::Conditional,
                "Country of branch responsible for report",
                "CY",
            )
            .with_notes("ISO 3166-1 alpha-2 country code of the booking/execution branch"),
            FieldSpec::new(
                "investment_firm_covered",
                "InvstmtFirmCvrd",
                T::Enum,
                R::Conditional,
                "Investment firm covered indicator",
                "Y",
            )
            .with_enum_values(&["Y", "N"])
            .with_notes("Whether the investment firm is covered by MiFID II"),
            FieldSpec::new(
                "transaction_id",
                "TxId",
                T::String,
                R::Required,
                "Transaction identifier",
                "5068869479P90006167594",
            )
            .with_notes("Unique transaction identifier"),
        ];

        Self { fields }
    }

    /// All fields in catalog insertion order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Fields with requirement level Required, in insertion order.
    pub fn required(&self) -> Vec<&FieldSpec> {
        self.by_requirement(Requirement::Required)
    }

    /// Fields with requirement level Conditional, in insertion order.
    pub fn conditional(&self) -> Vec<&FieldSpec> {
        self.by_requirement(Requirement::Conditional)
    }

    /// Fields with requirement level Optional, in insertion order.
    pub fn optional(&self) -> Vec<&FieldSpec> {
        self.by_requirement(Requirement::Optional)
    }

    fn by_requirement(&self, requirement: Requirement) -> Vec<&FieldSpec> {
        self.fields
            .iter()
            .filter(|f| f.requirement == requirement)
            .collect()
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
