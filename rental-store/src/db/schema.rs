//! Storage schema
//!
//! SCHEMAFULL table definitions mirroring the model `validate()` rules, so
//! writes that bypass the repositories are held to the same shape, enum,
//! range and uniqueness constraints. Every statement uses OVERWRITE and the
//! whole schema can be re-applied on each start.
//!
//! Optional embedded objects are declared `option<object>` with their
//! required keys asserted on the parent; their nested fields are `option<..>`
//! so an absent parent does not trip the nested type checks.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::repository::RepoResult;

pub const CUSTOMER: &str = "customer";
pub const PROMO_CODE: &str = "promo_code";
pub const MEMBERSHIP_TYPE: &str = "membership_type";
pub const FEE_TYPE: &str = "fee_type";
pub const MOVIE: &str = "movie";
pub const LOCATION: &str = "location";
pub const RENTAL: &str = "rental";

/// Tables in dependency order
pub const TABLES: [&str; 7] = [
    MEMBERSHIP_TYPE,
    FEE_TYPE,
    PROMO_CODE,
    MOVIE,
    LOCATION,
    CUSTOMER,
    RENTAL,
];

const MEMBERSHIP_TYPE_SCHEMA: &str = r#"
DEFINE TABLE OVERWRITE membership_type SCHEMAFULL;
DEFINE FIELD OVERWRITE code ON membership_type TYPE string
    ASSERT $value IN ["GOLD", "SILVER", "BRONZE"];
DEFINE FIELD OVERWRITE description ON membership_type TYPE option<string>;
DEFINE FIELD OVERWRITE monthly_cost_dkk ON membership_type TYPE number ASSERT $value >= 0;
DEFINE FIELD OVERWRITE benefits ON membership_type TYPE array<string> DEFAULT [];
DEFINE FIELD OVERWRITE is_active ON membership_type TYPE bool DEFAULT true;
DEFINE INDEX OVERWRITE membership_type_code ON membership_type FIELDS code UNIQUE;
"#;

const FEE_TYPE_SCHEMA: &str = r#"
DEFINE TABLE OVERWRITE fee_type SCHEMAFULL;
DEFINE FIELD OVERWRITE code ON fee_type TYPE string
    ASSERT $value IN ["LATE", "DAMAGED", "OTHER"];
DEFINE FIELD OVERWRITE description ON fee_type TYPE option<string>;
DEFINE FIELD OVERWRITE calculation ON fee_type TYPE string
    ASSERT $value IN ["flat", "per_day", "percentage", "other"];
DEFINE FIELD OVERWRITE default_amount_dkk ON fee_type TYPE number ASSERT $value >= 0;
DEFINE FIELD OVERWRITE is_taxable ON fee_type TYPE bool DEFAULT false;
DEFINE FIELD OVERWRITE is_active ON fee_type TYPE bool DEFAULT true;
DEFINE INDEX OVERWRITE fee_type_code ON fee_type FIELDS code UNIQUE;
"#;

const PROMO_CODE_SCHEMA: &str = r#"
DEFINE TABLE OVERWRITE promo_code SCHEMAFULL;
DEFINE FIELD OVERWRITE code ON promo_code TYPE string
    ASSERT string::len(string::trim($value)) > 0;
DEFINE FIELD OVERWRITE description ON promo_code TYPE option<string>;
DEFINE FIELD OVERWRITE percent_off ON promo_code TYPE option<number>
    ASSERT $value = NONE OR ($value >= 0 AND $value <= 100);
DEFINE FIELD OVERWRITE amount_off_dkk ON promo_code TYPE option<number>
    ASSERT $value = NONE OR $value >= 0;
DEFINE FIELD OVERWRITE starts_at ON promo_code TYPE option<int>;
DEFINE FIELD OVERWRITE ends_at ON promo_code TYPE option<int>;
DEFINE FIELD OVERWRITE is_active ON promo_code TYPE bool DEFAULT true;
DEFINE INDEX OVERWRITE promo_code_code ON promo_code FIELDS code UNIQUE;
"#;

const MOVIE_SCHEMA: &str = r#"
DEFINE TABLE OVERWRITE movie SCHEMAFULL;
DEFINE FIELD OVERWRITE title ON movie TYPE string
    ASSERT string::len(string::trim($value)) > 0;
DEFINE FIELD OVERWRITE release_year ON movie TYPE option<int>;
DEFINE FIELD OVERWRITE runtime_min ON movie TYPE option<int>
    ASSERT $value = NONE OR $value > 0;
DEFINE FIELD OVERWRITE rating ON movie TYPE option<int>
    ASSERT $value = NONE OR ($value >= 1 AND $value <= 10);
DEFINE FIELD OVERWRITE summary ON movie TYPE option<string>;
DEFINE FIELD OVERWRITE genres ON movie TYPE array<string> DEFAULT [];
DEFINE FIELD OVERWRITE reviews ON movie TYPE array<object> DEFAULT [];
DEFINE FIELD OVERWRITE reviews.*.id ON movie TYPE int;
DEFINE FIELD OVERWRITE reviews.*.customer ON movie TYPE option<record<customer>>;
DEFINE FIELD OVERWRITE reviews.*.rating ON movie TYPE int
    ASSERT $value >= 1 AND $value <= 10;
DEFINE FIELD OVERWRITE reviews.*.body ON movie TYPE option<string>;
DEFINE FIELD OVERWRITE reviews.*.created_at ON movie TYPE int;
DEFINE INDEX OVERWRITE movie_title ON movie FIELDS title;
DEFINE INDEX OVERWRITE movie_genres_year ON movie FIELDS genres, release_year;
"#;

const LOCATION_SCHEMA: &str = r#"
DEFINE TABLE OVERWRITE location SCHEMAFULL;
DEFINE FIELD OVERWRITE address ON location TYPE string
    ASSERT string::len(string::trim($value)) > 0;
DEFINE FIELD OVERWRITE city ON location TYPE string
    ASSERT string::len(string::trim($value)) > 0;
DEFINE FIELD OVERWRITE employees ON location TYPE array<object> DEFAULT [];
DEFINE FIELD OVERWRITE employees.*.id ON location TYPE int;
DEFINE FIELD OVERWRITE employees.*.first_name ON location TYPE string;
DEFINE FIELD OVERWRITE employees.*.last_name ON location TYPE string;
DEFINE FIELD OVERWRITE employees.*.email ON location TYPE string;
DEFINE FIELD OVERWRITE employees.*.phone_number ON location TYPE option<string>;
DEFINE FIELD OVERWRITE employees.*.is_active ON location TYPE bool DEFAULT true;
DEFINE FIELD OVERWRITE inventory ON location TYPE array<object> DEFAULT [];
DEFINE FIELD OVERWRITE inventory.*.id ON location TYPE int;
DEFINE FIELD OVERWRITE inventory.*.movie ON location TYPE record<movie>;
DEFINE FIELD OVERWRITE inventory.*.format ON location TYPE string
    ASSERT $value IN ["DVD", "BLU-RAY", "VHS", "DIGITAL"];
DEFINE FIELD OVERWRITE inventory.*.status ON location TYPE int
    ASSERT $value IN [1, 2, 3, 4];
DEFINE INDEX OVERWRITE location_city ON location FIELDS city;
"#;

const CUSTOMER_SCHEMA: &str = r#"
DEFINE TABLE OVERWRITE customer SCHEMAFULL;
DEFINE FIELD OVERWRITE first_name ON customer TYPE string
    ASSERT string::len(string::trim($value)) > 0;
DEFINE FIELD OVERWRITE last_name ON customer TYPE string
    ASSERT string::len(string::trim($value)) > 0;
DEFINE FIELD OVERWRITE email ON customer TYPE string
    ASSERT string::contains($value, "@");
DEFINE FIELD OVERWRITE email_key ON customer TYPE string
    ASSERT $value = string::lowercase($value);
DEFINE FIELD OVERWRITE phone_number ON customer TYPE option<string>;
DEFINE FIELD OVERWRITE created_at ON customer TYPE int;
DEFINE FIELD OVERWRITE address ON customer TYPE option<object>
    ASSERT $value = NONE
        OR ($value.street != NONE AND $value.city != NONE AND $value.post_code != NONE);
DEFINE FIELD OVERWRITE address.street ON customer TYPE option<string>;
DEFINE FIELD OVERWRITE address.city ON customer TYPE option<string>;
DEFINE FIELD OVERWRITE address.post_code ON customer TYPE option<string>;
DEFINE FIELD OVERWRITE membership ON customer TYPE option<object>
    ASSERT $value = NONE
        OR ($value.code IN ["GOLD", "SILVER", "BRONZE"]
            AND $value.starts_at != NONE
            AND $value.terms != NONE);
DEFINE FIELD OVERWRITE membership.code ON customer TYPE option<string>;
DEFINE FIELD OVERWRITE membership.starts_at ON customer TYPE option<int>;
DEFINE FIELD OVERWRITE membership.ends_at ON customer TYPE option<int>;
DEFINE FIELD OVERWRITE membership.terms ON customer TYPE option<object>;
DEFINE FIELD OVERWRITE membership.terms.code ON customer TYPE option<string>;
DEFINE FIELD OVERWRITE membership.terms.monthly_cost_dkk ON customer TYPE option<number>;
DEFINE FIELD OVERWRITE membership.terms.benefits ON customer TYPE option<array<string>>;
DEFINE FIELD OVERWRITE membership.terms.captured_at ON customer TYPE option<int>;
DEFINE FIELD OVERWRITE recent_rentals ON customer TYPE array<object> DEFAULT []
    ASSERT array::len($value) <= 5;
DEFINE FIELD OVERWRITE recent_rentals.*.rental ON customer TYPE record<rental>;
DEFINE FIELD OVERWRITE recent_rentals.*.status ON customer TYPE string
    ASSERT $value IN ["RESERVED", "OPEN", "RETURNED", "LATE", "CANCELLED"];
DEFINE FIELD OVERWRITE recent_rentals.*.rented_at ON customer TYPE int;
DEFINE INDEX OVERWRITE customer_email_key ON customer FIELDS email_key UNIQUE;
DEFINE INDEX OVERWRITE customer_name ON customer FIELDS last_name, first_name;
"#;

const RENTAL_SCHEMA: &str = r#"
DEFINE TABLE OVERWRITE rental SCHEMAFULL;
DEFINE FIELD OVERWRITE customer ON rental TYPE record<customer>;
DEFINE FIELD OVERWRITE location ON rental TYPE record<location>;
DEFINE FIELD OVERWRITE employee ON rental TYPE option<int>;
DEFINE FIELD OVERWRITE status ON rental TYPE string
    ASSERT $value IN ["RESERVED", "OPEN", "RETURNED", "LATE", "CANCELLED"];
DEFINE FIELD OVERWRITE rented_at ON rental TYPE int;
DEFINE FIELD OVERWRITE returned_at ON rental TYPE option<int>;
DEFINE FIELD OVERWRITE due_at ON rental TYPE option<int>;
DEFINE FIELD OVERWRITE reserved_at ON rental TYPE option<int>;
DEFINE FIELD OVERWRITE items ON rental TYPE array<object>
    ASSERT array::len($value) >= 1;
DEFINE FIELD OVERWRITE items.*.inventory_item_id ON rental TYPE int;
DEFINE FIELD OVERWRITE items.*.movie ON rental TYPE record<movie>;
DEFINE FIELD OVERWRITE payments ON rental TYPE array<object> DEFAULT [];
DEFINE FIELD OVERWRITE payments.*.id ON rental TYPE int;
DEFINE FIELD OVERWRITE payments.*.amount_dkk ON rental TYPE number ASSERT $value > 0;
DEFINE FIELD OVERWRITE payments.*.created_at ON rental TYPE int;
DEFINE FIELD OVERWRITE payments.*.method ON rental TYPE option<string>;
DEFINE FIELD OVERWRITE fees ON rental TYPE array<object> DEFAULT [];
DEFINE FIELD OVERWRITE fees.*.id ON rental TYPE int;
DEFINE FIELD OVERWRITE fees.*.fee_type ON rental TYPE string
    ASSERT $value IN ["LATE", "DAMAGED", "OTHER"];
DEFINE FIELD OVERWRITE fees.*.amount_dkk ON rental TYPE number ASSERT $value >= 0;
DEFINE FIELD OVERWRITE fees.*.created_at ON rental TYPE int;
DEFINE FIELD OVERWRITE fees.*.rule ON rental TYPE object;
DEFINE FIELD OVERWRITE fees.*.rule.calculation ON rental TYPE string
    ASSERT $value IN ["flat", "per_day", "percentage", "other"];
DEFINE FIELD OVERWRITE fees.*.rule.default_amount_dkk ON rental TYPE number;
DEFINE FIELD OVERWRITE fees.*.rule.is_taxable ON rental TYPE bool DEFAULT false;
DEFINE FIELD OVERWRITE promo ON rental TYPE option<object>
    ASSERT $value = NONE OR ($value.code != NONE AND $value.applied_at != NONE);
DEFINE FIELD OVERWRITE promo.code ON rental TYPE option<string>;
DEFINE FIELD OVERWRITE promo.percent_off ON rental TYPE option<number>;
DEFINE FIELD OVERWRITE promo.amount_off_dkk ON rental TYPE option<number>;
DEFINE FIELD OVERWRITE promo.starts_at ON rental TYPE option<int>;
DEFINE FIELD OVERWRITE promo.ends_at ON rental TYPE option<int>;
DEFINE FIELD OVERWRITE promo.applied_at ON rental TYPE option<int>;
DEFINE INDEX OVERWRITE rental_customer_status ON rental FIELDS customer, status, rented_at;
DEFINE INDEX OVERWRITE rental_status ON rental FIELDS status;
DEFINE INDEX OVERWRITE rental_location ON rental FIELDS location;
"#;

/// DDL per table, in dependency order
pub const DEFINITIONS: [(&str, &str); 7] = [
    (MEMBERSHIP_TYPE, MEMBERSHIP_TYPE_SCHEMA),
    (FEE_TYPE, FEE_TYPE_SCHEMA),
    (PROMO_CODE, PROMO_CODE_SCHEMA),
    (MOVIE, MOVIE_SCHEMA),
    (LOCATION, LOCATION_SCHEMA),
    (CUSTOMER, CUSTOMER_SCHEMA),
    (RENTAL, RENTAL_SCHEMA),
];

/// Apply every table definition
pub async fn apply_schema(db: &Surreal<Db>) -> RepoResult<()> {
    for (table, ddl) in DEFINITIONS {
        db.query(ddl).await?.check()?;
        tracing::debug!(table = %table, "Schema applied");
    }
    tracing::info!("Schema ready ({} tables)", DEFINITIONS.len());
    Ok(())
}
