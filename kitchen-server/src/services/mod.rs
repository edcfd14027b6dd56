//! External collaborators: product catalog, tables, printing

pub mod catalog;
pub mod printing;
pub mod tables;

pub use catalog::{CatalogError, CatalogService, ProductCatalog, ProductInfo};
pub use printing::{KitchenTicket, KitchenTicketItem, LogPrinter, PrintError, PrintService};
pub use tables::{TableError, TableRegistry, TableService, TableStatus};
