//! Configuração do servidor via variáveis de ambiente.

use anyhow::{bail, Context};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::pdf::branding;

/// Renderizador de PDF ativo nesta instância.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererEscolha {
    /// Desenho direto em Rust, sem dependência externa (padrão).
    Printpdf,
    /// Compilação via CLI `typst`.
    Typst,
    /// Typst com printpdf de reserva.
    Robust,
}

impl FromStr for RendererEscolha {
    type Err = anyhow::Error;

    fn from_str(valor: &str) -> Result<Self, Self::Err> {
        match valor.trim().to_ascii_lowercase().as_str() {
            "printpdf" => Ok(Self::Printpdf),
            "typst" => Ok(Self::Typst),
            "robust" => Ok(Self::Robust),
            outro => bail!(
                "PDF_RENDERER inválido: '{}' (use printpdf, typst ou robust)",
                outro
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub porta: u16,
    pub renderer: RendererEscolha,
    pub timeout_fotos: Duration,
    pub diretorio_estatico: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let porta = match std::env::var("PORT") {
            Ok(valor) => valor.parse::<u16>().context("PORT inválida")?,
            Err(_) => 8080,
        };

        let renderer = match std::env::var("PDF_RENDERER") {
            Ok(valor) => valor.parse()?,
            Err(_) => RendererEscolha::Printpdf,
        };

        let timeout_fotos = match std::env::var("PHOTO_TIMEOUT_SECS") {
            Ok(valor) => Duration::from_secs(
                valor
                    .parse::<u64>()
                    .context("PHOTO_TIMEOUT_SECS inválido")?,
            ),
            Err(_) => Duration::from_secs(30),
        };

        let diretorio_estatico = std::env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| branding::diretorio_padrao());

        Ok(Self {
            host,
            porta,
            renderer,
            timeout_fotos,
            diretorio_estatico,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_escolha_parse() {
        assert_eq!(
            "printpdf".parse::<RendererEscolha>().unwrap(),
            RendererEscolha::Printpdf
        );
        assert_eq!(
            " Typst ".parse::<RendererEscolha>().unwrap(),
            RendererEscolha::Typst
        );
        assert_eq!(
            "robust".parse::<RendererEscolha>().unwrap(),
            RendererEscolha::Robust
        );
        assert!("puppeteer".parse::<RendererEscolha>().is_err());
    }
}
