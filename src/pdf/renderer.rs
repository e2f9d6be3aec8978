//! Contrato de renderização e seleção da implementação ativa.
//!
//! Apenas um renderizador fica ativo por instância do servidor; a
//! escolha vem da configuração. O modo `robust` compõe o renderizador
//! Typst com o printpdf como reserva.

use std::sync::Arc;

use crate::config::RendererEscolha;

use super::branding::Branding;
use super::printpdf::PrintpdfRenderer;
use super::robust::RobustRenderer;
use super::typst::TypstRenderer;
use super::{Documento, RenderError};

/// Renderiza um [`Documento`] montado em bytes de PDF.
pub trait PdfRenderer: Send + Sync {
    /// Nome curto para logs.
    fn nome(&self) -> &'static str;

    fn render(&self, documento: &Documento) -> Result<Vec<u8>, RenderError>;
}

/// Constrói o renderizador ativo a partir da configuração.
pub fn montar_renderer(escolha: RendererEscolha, branding: Arc<Branding>) -> Arc<dyn PdfRenderer> {
    match escolha {
        RendererEscolha::Printpdf => Arc::new(PrintpdfRenderer::new(branding)),
        RendererEscolha::Typst => Arc::new(TypstRenderer::new(branding)),
        RendererEscolha::Robust => Arc::new(RobustRenderer::new(
            Box::new(TypstRenderer::new(Arc::clone(&branding))),
            Box::new(PrintpdfRenderer::new(branding)),
        )),
    }
}
