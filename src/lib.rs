// Library root
// ------------
// Operator tooling for a nutrition-labeling GraphQL API. The binary
// (`main.rs`) wires these modules into an interactive menu.
//
// Module responsibilities:
// - `api`: blocking GraphQL client and the `GraphQl` seam used by the flows.
// - `queries`: static request documents.
// - `json`, `flatten`, `table`: safe navigation over responses, projection
//   onto flat rows, and CSV/JSON output files.
// - `labels`, `export`, `import`, `download`: one module per operator flow.
// - `config`, `logging`, `prompt`, `ui`: settings, log setup, input parsing
//   and the terminal menus.
pub mod api;
pub mod config;
pub mod download;
pub mod error;
pub mod export;
pub mod flatten;
pub mod import;
pub mod json;
pub mod labels;
pub mod logging;
pub mod prompt;
pub mod queries;
pub mod search;
pub mod table;
pub mod tables;
pub mod ui;
