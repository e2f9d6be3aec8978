mod common;

use std::collections::HashMap;

use common::{png_bytes, png_data_uri, MockFotoFonte};
use zeladoria_server::pdf::images::{carregar_fotos, carregar_secoes, decodificar, FormatoFoto};
use zeladoria_server::relatorio::models::{Foto, Secao, Servico};

fn foto(url: &str, ordem: Option<u32>) -> Foto {
    Foto {
        url: url.to_string(),
        descricao: None,
        ordem,
    }
}

#[tokio::test]
async fn test_data_uri_valida_fica_disponivel() {
    let fonte = MockFotoFonte::default();
    let carregadas = carregar_fotos(&fonte, &[foto(&png_data_uri(), None)]).await;

    assert_eq!(carregadas.len(), 1);
    assert!(carregadas[0].disponivel());
    let imagem = carregadas[0].imagem.as_ref().unwrap();
    assert_eq!(imagem.formato, FormatoFoto::Png);
    assert_eq!(imagem.largura, 4);
    assert_eq!(imagem.altura, 3);
}

#[tokio::test]
async fn test_base64_invalido_vira_marcador() {
    let fonte = MockFotoFonte::default();
    let carregadas =
        carregar_fotos(&fonte, &[foto("data:image/png;base64,@@@@", None)]).await;

    assert_eq!(carregadas.len(), 1);
    assert!(!carregadas[0].disponivel());
}

#[tokio::test]
async fn test_url_conhecida_busca_na_fonte() {
    let mut arquivos = HashMap::new();
    arquivos.insert("https://example.com/a.png".to_string(), png_bytes());
    let fonte = MockFotoFonte { arquivos };

    let carregadas = carregar_fotos(&fonte, &[foto("https://example.com/a.png", None)]).await;
    assert!(carregadas[0].disponivel());
}

#[tokio::test]
async fn test_url_inacessivel_vira_marcador() {
    let fonte = MockFotoFonte::default();
    let carregadas =
        carregar_fotos(&fonte, &[foto("https://example.com/x.png", None)]).await;
    assert!(!carregadas[0].disponivel());
}

#[tokio::test]
async fn test_esquema_desconhecido_vira_marcador() {
    let fonte = MockFotoFonte::default();
    let carregadas = carregar_fotos(&fonte, &[foto("ftp://example.com/x.png", None)]).await;
    assert!(!carregadas[0].disponivel());
}

#[tokio::test]
async fn test_carregar_fotos_respeita_ordem() {
    let mut arquivos = HashMap::new();
    arquivos.insert("https://example.com/a.png".to_string(), png_bytes());
    let fonte = MockFotoFonte { arquivos };

    let mut primeira = foto("https://example.com/a.png", Some(2));
    primeira.descricao = Some("segunda na saída".to_string());
    let mut segunda = foto("https://example.com/inexistente.png", Some(1));
    segunda.descricao = Some("primeira na saída".to_string());

    let carregadas = carregar_fotos(&fonte, &[primeira, segunda]).await;
    assert_eq!(carregadas.len(), 2);
    assert_eq!(
        carregadas[0].descricao.as_deref(),
        Some("primeira na saída")
    );
    assert!(!carregadas[0].disponivel());
    assert!(carregadas[1].disponivel());
}

#[tokio::test]
async fn test_secao_herda_assunto_como_legenda() {
    let fonte = MockFotoFonte::default();
    let secoes = vec![Secao {
        sub: "ST".to_string(),
        local: None,
        descricao: None,
        servicos: vec![Servico {
            assunto: "Capinação".to_string(),
            fotos: vec![
                foto("https://example.com/a.png", None),
                Foto {
                    url: "https://example.com/b.png".to_string(),
                    descricao: Some("Legenda própria".to_string()),
                    ordem: None,
                },
            ],
        }],
    }];

    let carregadas = carregar_secoes(&fonte, &secoes).await;
    assert_eq!(carregadas.len(), 1);
    assert_eq!(carregadas[0].len(), 2);
    assert_eq!(carregadas[0][0].descricao.as_deref(), Some("Capinação"));
    assert_eq!(
        carregadas[0][1].descricao.as_deref(),
        Some("Legenda própria")
    );
}

#[test]
fn test_decodificar_achata_alfa_para_rgb() {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;

    // PNG RGBA 2x2 com alfa parcial
    let png_rgba = BASE64
        .decode("iVBORw0KGgoAAAANSUhEUgAAAAIAAAACCAYAAABytg0kAAAAEUlEQVR4nGM4ISfXAMIMMAYAOFIGEdjoopEAAAAASUVORK5CYII=")
        .unwrap();

    let imagem = decodificar(png_rgba).expect("PNG RGBA de teste deve decodificar");
    assert!(!imagem.imagem.color().has_alpha());
    assert_eq!(imagem.largura, 2);
    assert_eq!(imagem.altura, 2);
}
