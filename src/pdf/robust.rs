//! Composição primário + reserva.
//!
//! Tenta o renderizador primário uma única vez e, em caso de falha,
//! cai para a reserva. Não há nova tentativa além dessa.

use super::renderer::PdfRenderer;
use super::{Documento, RenderError};

pub struct RobustRenderer {
    primario: Box<dyn PdfRenderer>,
    reserva: Box<dyn PdfRenderer>,
}

impl RobustRenderer {
    pub fn new(primario: Box<dyn PdfRenderer>, reserva: Box<dyn PdfRenderer>) -> Self {
        Self { primario, reserva }
    }
}

impl PdfRenderer for RobustRenderer {
    fn nome(&self) -> &'static str {
        "robust"
    }

    fn render(&self, documento: &Documento) -> Result<Vec<u8>, RenderError> {
        match self.primario.render(documento) {
            Ok(pdf) => Ok(pdf),
            Err(erro) => {
                log::warn!(
                    "renderizador {} falhou ({}), usando {}",
                    self.primario.nome(),
                    erro,
                    self.reserva.nome()
                );
                self.reserva.render(documento)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixo(Result<Vec<u8>, ()>);

    impl PdfRenderer for Fixo {
        fn nome(&self) -> &'static str {
            "fixo"
        }

        fn render(&self, _documento: &Documento) -> Result<Vec<u8>, RenderError> {
            self.0
                .clone()
                .map_err(|_| RenderError::Pdf("falha simulada".to_string()))
        }
    }

    fn documento_vazio() -> Documento {
        Documento {
            titulo: "Teste".to_string(),
            paginas: Vec::new(),
        }
    }

    #[test]
    fn test_usa_primario_quando_funciona() {
        let robusto = RobustRenderer::new(
            Box::new(Fixo(Ok(b"primario".to_vec()))),
            Box::new(Fixo(Ok(b"reserva".to_vec()))),
        );
        assert_eq!(robusto.render(&documento_vazio()).unwrap(), b"primario");
    }

    #[test]
    fn test_cai_para_reserva_na_falha() {
        let robusto = RobustRenderer::new(
            Box::new(Fixo(Err(()))),
            Box::new(Fixo(Ok(b"reserva".to_vec()))),
        );
        assert_eq!(robusto.render(&documento_vazio()).unwrap(), b"reserva");
    }

    #[test]
    fn test_propaga_erro_quando_ambos_falham() {
        let robusto =
            RobustRenderer::new(Box::new(Fixo(Err(()))), Box::new(Fixo(Err(()))));
        assert!(robusto.render(&documento_vazio()).is_err());
    }
}
