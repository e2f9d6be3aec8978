use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use zeladoria_server::pdf::{Documento, PdfRenderer, RenderError};

/// PNG 4x3 válido usado como foto nos testes.
pub const PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAQAAAADCAIAAAA7ljmRAAAAEElEQVR4nGM4IScHRww4OQD1xwwxB+utmQAAAABJRU5ErkJggg==";

pub fn png_bytes() -> Vec<u8> {
    BASE64.decode(PNG_BASE64).expect("PNG de teste inválido")
}

pub fn png_data_uri() -> String {
    format!("data:image/png;base64,{}", PNG_BASE64)
}

/// Fonte de fotos em memória para os testes.
#[derive(Default)]
pub struct MockFotoFonte {
    pub arquivos: HashMap<String, Vec<u8>>,
}

#[async_trait]
impl zeladoria_server::pdf::images::FotoFonte for MockFotoFonte {
    async fn buscar(&self, url: &str) -> Result<Vec<u8>, String> {
        self.arquivos
            .get(url)
            .cloned()
            .ok_or_else(|| format!("foto não encontrada: {}", url))
    }
}

/// Renderizador que conta as chamadas antes de delegar.
pub struct ContadorRenderer {
    pub interno: Arc<dyn PdfRenderer>,
    pub chamadas: Arc<AtomicUsize>,
}

impl PdfRenderer for ContadorRenderer {
    fn nome(&self) -> &'static str {
        "contador"
    }

    fn render(&self, documento: &Documento) -> Result<Vec<u8>, RenderError> {
        self.chamadas.fetch_add(1, Ordering::SeqCst);
        self.interno.render(documento)
    }
}
