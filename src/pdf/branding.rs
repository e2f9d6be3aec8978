//! Imagens institucionais (logo, fundo de capa, filete decorativo).
//!
//! Lidas uma única vez do diretório `static/` e mantidas em cache.
//! Arquivo ausente não é erro: a página correspondente sai sem a arte.

use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::images::{decodificar, ImagemFoto};

const ARQUIVO_LOGO: &str = "logo.png";
const ARQUIVO_CAPA: &str = "capa.png";
const ARQUIVO_LINHA: &str = "linha.png";

/// Diretório padrão dos arquivos estáticos do crate.
pub fn diretorio_padrao() -> PathBuf {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")).to_path_buf()
}

/// Conjunto de imagens institucionais decodificadas.
#[derive(Debug, Default)]
pub struct BrandingImagens {
    pub logo: Option<ImagemFoto>,
    pub capa: Option<ImagemFoto>,
    pub linha: Option<ImagemFoto>,
}

/// Cache das imagens institucionais.
pub struct Branding {
    diretorio: PathBuf,
    cache: RwLock<Option<Arc<BrandingImagens>>>,
}

impl Branding {
    pub fn new(diretorio: PathBuf) -> Self {
        Self {
            diretorio,
            cache: RwLock::new(None),
        }
    }

    pub fn diretorio(&self) -> &Path {
        &self.diretorio
    }

    /// Imagens decodificadas; a primeira chamada lê o disco.
    pub fn imagens(&self) -> Arc<BrandingImagens> {
        if let Some(imagens) = self.cache.read().as_ref() {
            return Arc::clone(imagens);
        }

        let mut escrita = self.cache.write();
        if let Some(imagens) = escrita.as_ref() {
            return Arc::clone(imagens);
        }

        let imagens = Arc::new(BrandingImagens {
            logo: carregar_arquivo(&self.diretorio, ARQUIVO_LOGO),
            capa: carregar_arquivo(&self.diretorio, ARQUIVO_CAPA),
            linha: carregar_arquivo(&self.diretorio, ARQUIVO_LINHA),
        });
        *escrita = Some(Arc::clone(&imagens));
        imagens
    }

    /// Caminhos dos arquivos presentes no disco, na ordem
    /// logo/capa/linha, para renderizadores que copiam arquivos.
    pub fn arquivos(&self) -> Vec<(&'static str, PathBuf)> {
        [ARQUIVO_LOGO, ARQUIVO_CAPA, ARQUIVO_LINHA]
            .iter()
            .filter_map(|nome| {
                let caminho = self.diretorio.join(nome);
                caminho.is_file().then_some((*nome, caminho))
            })
            .collect()
    }
}

fn carregar_arquivo(diretorio: &Path, nome: &str) -> Option<ImagemFoto> {
    let caminho = diretorio.join(nome);
    match fs::read(&caminho) {
        Ok(bytes) => {
            let decodificada = decodificar(bytes);
            if decodificada.is_none() {
                log::warn!("arquivo institucional não decodificável: {}", caminho.display());
            }
            decodificada
        }
        Err(e) => {
            log::warn!(
                "arquivo institucional ausente ({}): {}",
                caminho.display(),
                e
            );
            None
        }
    }
}
