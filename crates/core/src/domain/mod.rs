pub mod price_book;
pub mod price_entry;
pub mod quote;
pub mod tax_rule;
