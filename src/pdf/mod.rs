//! Montagem e renderização dos relatórios em PDF.
//!
//! O fluxo tem três camadas:
//! - `layout` transforma um relatório validado em um [`Documento`]
//!   (sequência de páginas), concentrando a paginação de fotos num só
//!   lugar;
//! - `images` resolve as fotos (URL ou data-URI) antes da montagem,
//!   degradando falhas para um marcador de imagem indisponível;
//! - `renderer` define o contrato [`PdfRenderer`] com as implementações
//!   `printpdf` (padrão, sem binário externo), `typst` (CLI) e `robust`
//!   (primário com reserva).

pub mod branding;
pub mod documento;
pub mod images;
pub mod layout;
pub mod printpdf;
pub mod renderer;
pub mod robust;
pub mod typst;

pub use documento::{Documento, Pagina};
pub use renderer::{montar_renderer, PdfRenderer};

use thiserror::Error;

/// Erros de renderização de um documento já montado.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("failed to write photo for compilation: {0}")]
    WriteFoto(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {0}")]
    TypstExit(i32),
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
    #[error("PDF assembly failed: {0}")]
    Pdf(String),
}

/// Resultado de uma geração bem-sucedida.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub filename: String,
    pub pdf: Vec<u8>,
    pub paginas: usize,
}
