//! Domínio dos relatórios: modelos de dados, validação, nomes de
//! arquivo e handlers HTTP.

pub mod datas;
pub mod filename;
pub mod handlers;
pub mod models;
pub mod validation;
