//! Aquisição e decodificação das fotos dos relatórios.
//!
//! Fotos chegam como URL http(s) ou data-URI base64. Qualquer falha de
//! busca ou decodificação vira um marcador de imagem indisponível; a
//! geração do documento nunca aborta por causa de uma foto.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use lazy_static::lazy_static;
use printpdf::image_crate::{self, DynamicImage};
use regex::Regex;
use reqwest::Client;
use std::time::Duration;

use crate::relatorio::models::{Foto, Secao};

lazy_static! {
    static ref DATA_URI_RE: Regex =
        Regex::new(r"^data:image/[a-zA-Z+.-]+;base64,").expect("regex de data-URI inválida");
}

/// Formato de imagem reconhecido pelos renderizadores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatoFoto {
    Png,
    Jpeg,
    Gif,
}

impl FormatoFoto {
    /// Extensão de arquivo usada na compilação Typst.
    pub fn extensao(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
        }
    }

    /// Detecta o formato pelos bytes iniciais.
    pub fn detectar(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(Self::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }
        None
    }
}

/// Foto decodificada, com os bytes originais preservados para os
/// renderizadores que trabalham com arquivos.
#[derive(Clone)]
pub struct ImagemFoto {
    pub bytes: Vec<u8>,
    pub formato: FormatoFoto,
    pub imagem: DynamicImage,
    pub largura: u32,
    pub altura: u32,
}

impl std::fmt::Debug for ImagemFoto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagemFoto")
            .field("formato", &self.formato)
            .field("largura", &self.largura)
            .field("altura", &self.altura)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Foto resolvida para montagem de página. `imagem == None` indica o
/// marcador de imagem indisponível.
#[derive(Debug, Clone)]
pub struct FotoCarregada {
    pub imagem: Option<ImagemFoto>,
    pub descricao: Option<String>,
}

impl FotoCarregada {
    pub fn indisponivel(descricao: Option<String>) -> Self {
        Self {
            imagem: None,
            descricao,
        }
    }

    pub fn disponivel(&self) -> bool {
        self.imagem.is_some()
    }
}

/// Fonte de bytes de fotos endereçadas por URL.
///
/// Os testes substituem a implementação HTTP por um mock.
#[async_trait]
pub trait FotoFonte: Send + Sync {
    async fn buscar(&self, url: &str) -> Result<Vec<u8>, String>;
}

/// Fonte HTTP com timeout configurado.
pub struct HttpFotoFonte {
    client: Client,
}

impl HttpFotoFonte {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FotoFonte for HttpFotoFonte {
    async fn buscar(&self, url: &str) -> Result<Vec<u8>, String> {
        let resposta = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !resposta.status().is_success() {
            return Err(format!("HTTP {}", resposta.status()));
        }

        let bytes = resposta.bytes().await.map_err(|e| e.to_string())?;
        Ok(bytes.to_vec())
    }
}

/// Ordena fotos pelo campo `ordem` (ausente conta como 0, ordenação
/// estável preserva a ordem de chegada).
pub fn ordenar_fotos(fotos: &[Foto]) -> Vec<Foto> {
    let mut ordenadas = fotos.to_vec();
    ordenadas.sort_by_key(|f| f.ordem.unwrap_or(0));
    ordenadas
}

/// Resolve uma foto: busca os bytes e decodifica. Falhas viram o
/// marcador de indisponível.
pub async fn carregar_foto(fonte: &dyn FotoFonte, foto: &Foto) -> FotoCarregada {
    match obter_bytes(fonte, &foto.url).await {
        Ok(bytes) => match decodificar(bytes) {
            Some(imagem) => FotoCarregada {
                imagem: Some(imagem),
                descricao: foto.descricao.clone(),
            },
            None => {
                log::warn!("foto não decodificável, usando marcador: {}", resumo_url(&foto.url));
                FotoCarregada::indisponivel(foto.descricao.clone())
            }
        },
        Err(motivo) => {
            log::warn!(
                "falha ao obter foto ({}), usando marcador: {}",
                motivo,
                resumo_url(&foto.url)
            );
            FotoCarregada::indisponivel(foto.descricao.clone())
        }
    }
}

/// Resolve todas as fotos de um relatório, já ordenadas, em paralelo.
pub async fn carregar_fotos(fonte: &dyn FotoFonte, fotos: &[Foto]) -> Vec<FotoCarregada> {
    let ordenadas = ordenar_fotos(fotos);
    futures::future::join_all(ordenadas.iter().map(|f| carregar_foto(fonte, f))).await
}

/// Resolve as fotos de cada seção de mutirão. As fotos de um serviço
/// herdam o assunto como legenda quando não têm descrição própria.
pub async fn carregar_secoes(fonte: &dyn FotoFonte, secoes: &[Secao]) -> Vec<Vec<FotoCarregada>> {
    let mut resultado = Vec::with_capacity(secoes.len());

    for secao in secoes {
        let mut fotos_secao = Vec::new();
        for servico in &secao.servicos {
            for foto in ordenar_fotos(&servico.fotos) {
                let mut foto = foto;
                if foto.descricao.is_none() {
                    foto.descricao = Some(servico.assunto.clone());
                }
                fotos_secao.push(foto);
            }
        }

        let carregadas =
            futures::future::join_all(fotos_secao.iter().map(|f| carregar_foto(fonte, f))).await;
        resultado.push(carregadas);
    }

    resultado
}

async fn obter_bytes(fonte: &dyn FotoFonte, url: &str) -> Result<Vec<u8>, String> {
    if let Some(prefixo) = DATA_URI_RE.find(url) {
        return BASE64
            .decode(url[prefixo.end()..].trim())
            .map_err(|e| format!("base64 inválido: {}", e));
    }

    if url.starts_with("http://") || url.starts_with("https://") {
        return fonte.buscar(url).await;
    }

    Err("endereço de foto não reconhecido".to_string())
}

/// Decodifica os bytes de uma foto. Imagens com canal alfa são
/// achatadas sobre fundo branco; o PDF não carrega transparência.
pub fn decodificar(bytes: Vec<u8>) -> Option<ImagemFoto> {
    let formato = FormatoFoto::detectar(&bytes)?;
    let imagem = image_crate::load_from_memory(&bytes).ok()?;
    let imagem = achatar_alfa(imagem);
    let largura = imagem.width();
    let altura = imagem.height();

    Some(ImagemFoto {
        bytes,
        formato,
        imagem,
        largura,
        altura,
    })
}

fn achatar_alfa(imagem: DynamicImage) -> DynamicImage {
    if !imagem.color().has_alpha() {
        return imagem;
    }

    let rgba = imagem.to_rgba8();
    let (largura, altura) = rgba.dimensions();
    let mut rgb = image_crate::RgbImage::new(largura, altura);

    for (x, y, px) in rgba.enumerate_pixels() {
        let alfa = px[3] as u32;
        let sobre_branco = |c: u8| ((c as u32 * alfa + 255 * (255 - alfa)) / 255) as u8;
        rgb.put_pixel(
            x,
            y,
            image_crate::Rgb([sobre_branco(px[0]), sobre_branco(px[1]), sobre_branco(px[2])]),
        );
    }

    DynamicImage::ImageRgb8(rgb)
}

fn resumo_url(url: &str) -> &str {
    if url.len() <= 80 {
        return url;
    }
    let mut fim = 80;
    while !url.is_char_boundary(fim) {
        fim -= 1;
    }
    &url[..fim]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detectar_formato() {
        assert_eq!(
            FormatoFoto::detectar(&[0x89, 0x50, 0x4E, 0x47, 0x0D]),
            Some(FormatoFoto::Png)
        );
        assert_eq!(
            FormatoFoto::detectar(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(FormatoFoto::Jpeg)
        );
        assert_eq!(FormatoFoto::detectar(b"GIF89a..."), Some(FormatoFoto::Gif));
        assert_eq!(FormatoFoto::detectar(b"%PDF-1.4"), None);
    }

    #[test]
    fn test_ordenar_fotos_estavel() {
        let fotos = vec![
            Foto {
                url: "a".into(),
                descricao: None,
                ordem: Some(2),
            },
            Foto {
                url: "b".into(),
                descricao: None,
                ordem: None,
            },
            Foto {
                url: "c".into(),
                descricao: None,
                ordem: Some(1),
            },
            Foto {
                url: "d".into(),
                descricao: None,
                ordem: None,
            },
        ];

        let ordenadas = ordenar_fotos(&fotos);
        let urls: Vec<&str> = ordenadas.iter().map(|f| f.url.as_str()).collect();
        // sem ordem conta como 0 e mantém a posição relativa
        assert_eq!(urls, vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_decodificar_bytes_invalidos() {
        assert!(decodificar(b"nao \xc3\xa9 imagem".to_vec()).is_none());
        assert!(decodificar(vec![0x89, 0x50, 0x4E, 0x47]).is_none());
    }
}
