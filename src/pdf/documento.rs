//! Modelo intermediário de documento.
//!
//! Um [`Documento`] é a sequência de páginas de um relatório, pronta
//! para qualquer renderizador. A sequência segue sempre o mesmo
//! contrato: capa, páginas de conteúdo e contracapa.

use crate::relatorio::models::QuantitativoItem;

use super::images::FotoCarregada;

/// Documento montado, pronto para renderização.
#[derive(Debug)]
pub struct Documento {
    pub titulo: String,
    pub paginas: Vec<Pagina>,
}

impl Documento {
    pub fn numero_paginas(&self) -> usize {
        self.paginas.len()
    }

    /// Quantidade de páginas de grade de fotos.
    pub fn paginas_de_fotos(&self) -> usize {
        self.paginas
            .iter()
            .filter(|p| matches!(p, Pagina::GradeFotos(_)))
            .count()
    }
}

/// Capa do relatório.
#[derive(Debug)]
pub struct Capa {
    pub titulo: String,
    pub subtitulo: String,
    /// Linhas informativas ("Data: ...", "Sub-região: ...").
    pub info: Vec<String>,
    /// Linha de rodapé da capa ("São Paulo, Janeiro de 2024").
    pub data_extenso: String,
}

/// Bloco descritor exibido na primeira página de fotos de cada grupo.
#[derive(Debug, Default)]
pub struct CabecalhoFotos {
    /// Pares rótulo → valor, na ordem de exibição.
    pub campos: Vec<(String, String)>,
}

/// Página de grade de fotos.
#[derive(Debug)]
pub struct GradeFotos {
    /// Título da faixa de cabeçalho da página.
    pub titulo: String,
    pub cabecalho: Option<CabecalhoFotos>,
    pub fotos: Vec<FotoCarregada>,
    /// Quantidade de colunas da grade (2 para mutirão, 3 nos demais).
    pub colunas: usize,
    /// Índice da primeira foto da página dentro do relatório.
    pub inicio: usize,
}

/// Linha da listagem de serviços rotineiros.
#[derive(Debug)]
pub struct LinhaServico {
    pub assunto: String,
    pub quantidade_fotos: usize,
}

/// Uma página do documento.
#[derive(Debug)]
pub enum Pagina {
    Capa(Capa),
    Quantitativo { itens: Vec<QuantitativoItem> },
    GradeFotos(GradeFotos),
    ListaServicos {
        servicos: Vec<LinhaServico>,
        /// Número de ordem do primeiro serviço da página.
        inicio: usize,
    },
    Contracapa,
}
