//! Prompt building functions for generation requests
//!
//! Serializes the current story state into the single payload the external
//! generator receives. The section order is fixed and significant: it encodes
//! the context-priority hierarchy (laws > rules > characters > events >
//! history > current command) the generator is tuned to honor. This module
//! only serializes; it does not enforce that hierarchy.
//!
//! The section tags, fallback strings, and instructions are the wire format
//! the generator was calibrated against and must stay byte-stable.

use fabula_domain::{GenerationAction, Reference, Story, StoryBlock};

use crate::infrastructure::ports::LlmRequest;

/// Sentinel command sent when the writer submits without typing anything.
pub const CONTINUE_SENTINEL: &str = "continue";

/// Driving instruction used when regenerating a block with no user turn
/// anywhere before it.
pub const REGENERATE_FALLBACK_PROMPT: &str = "Continue a narrativa.";

/// Sampling temperature for narrative generation.
pub const DEFAULT_TEMPERATURE: f32 = 0.9;

/// Thinking-token budget for narrative generation.
pub const DEFAULT_THINKING_BUDGET: u32 = 4000;

/// Base system instruction: author behavior, the laws of the story, POV
/// neutrality, and strict formatting rules.
const SYSTEM_INSTRUCTION_BASE: &str = r#"Você é um escritor literário profissional de altíssimo nível, atuando sob as LEIS DA HISTÓRIA definidas pela usuária.

━━━━━━━━━━━━━━━━━━━━━━
COMPORTAMENTO DE AUTOR (PRIORIDADE)
━━━━━━━━━━━━━━━━━━━━━━
- Você escreve como um autor literário, não como um assistente ou chatbot.
- Ritmo Narrativo: Não apresse a história. Não pule dias, semanas ou meses sem comando explícito.
- Detalhamento: Desenvolva cenas com tempo, detalhes sensoriais, emoções e diálogos realistas.
- Imersão: Mantenha a imersão contínua como em um livro físico. Se o usuário disser "continue", prossiga a cena atual mantendo o ritmo.
- Proatividade: Você pode desenvolver conflitos, pensamentos internos e ações sem esperar por permissão, desde que respeite as Leis da História.

━━━━━━━━━━━━━━━━━━━━━━
PRIORIDADE MÁXIMA: AS LEIS DA HISTÓRIA
━━━━━━━━━━━━━━━━━━━━━━
As Leis da História governam toda a narrativa.
1. CONTEXTO TEMPORAL: Respeite a época definida.
2. TOM: Siga o Tom Principal e Secundários.
3. UNIVERSO: Respeite as regras do universo.
4. REFERÊNCIA:
   - Se "BASEADO EM": Respeite fatos oficiais da obra original.
   - Se "INSPIRADO EM": Use apenas a estética; NÃO siga a cronologia oficial.

━━━━━━━━━━━━━━━━━━━━━━
REGRA DE OURO: NEUTRALIDADE E POV
━━━━━━━━━━━━━━━━━━━━━━
Você escreve do PONTO DE VISTA INTERNO. NÃO julga, NÃO moraliza e NÃO impõe redenção forçada. Se o personagem for cruel, narre a crueldade como parte da verdade dele.

━━━━━━━━━━━━━━━━━━━━━━
REGRAS DE FORMATAÇÃO (ESTRITAS)
━━━━━━━━━━━━━━━━━━━━━━
Use apenas Markdown SIMPLES:
- Negrito: **texto**
- Itálico: *texto*
- Negrito + Itálico: ***texto***

PROIBIÇÕES:
- NÃO use underline (__), hashtags (#), riscado (~~) ou cabeçalhos.
- NÃO aninhe formatações.
- Toda formatação DEVE ser aberta e fechada corretamente. Nunca deixe símbolos soltos.

━━━━━━━━━━━━━━━━━━━━━━
HIERARQUIA DE CONTEXTO
━━━━━━━━━━━━━━━━━━━━━━
1. LEIS DA HISTÓRIA
2. REGRAS ABSOLUTAS
3. FICHAS DE PERSONAGEM (Se existirem. Se não, você as cria conforme narra).
4. EVENTOS IMPORTANTES
5. HISTÓRICO RECENTE

━━━━━━━━━━━━━━━━━━━━━━
NOTAS ADICIONAIS
━━━━━━━━━━━━━━━━━━━━━━
- Nenhuma informação é obrigatória. Se o usuário não definiu algo, você cria e decide.
- Sem Metalinguagem: Não explique suas escolhas. Apenas NARRE."#;

/// Per-action instruction appended to the base system instruction.
fn action_instruction(action: GenerationAction, prompt: &str) -> String {
    match action {
        GenerationAction::Continue => {
            "Ação: Continue a cena atual. Se o prompt for curto ou vago, simplesmente desenvolva o que está acontecendo no momento com ritmo literário.".to_string()
        }
        GenerationAction::Rewrite => format!(
            "Ação: Reescreva o último trecho preservando o estilo literário e atendendo: {prompt}"
        ),
        GenerationAction::NewChapter => {
            "Ação: Inicie um novo capítulo ou mude drasticamente de cena, mantendo a coerência narrativa.".to_string()
        }
    }
}

/// Build the full system instruction for an action.
pub fn build_system_instruction(action: GenerationAction, prompt: &str) -> String {
    format!(
        "{}\n{}",
        SYSTEM_INSTRUCTION_BASE,
        action_instruction(action, prompt)
    )
}

/// Render the narrative history: every block's ACTIVE version in sequence
/// order, user instructions tagged so the generator can tell command from
/// prose.
pub fn render_history(blocks: &[StoryBlock]) -> String {
    blocks
        .iter()
        .map(|block| {
            let text = block.active_text();
            if block.author().is_user() {
                format!("[ORDEM DO AUTOR]: {text}")
            } else {
                text.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_characters(story: &Story) -> String {
    story
        .characters()
        .iter()
        .map(|c| {
            format!(
                "PERSONAGEM: {}\n- Aparência: {}\n- POV/Personalidade: {}\n- Dinâmica: {}",
                c.name(),
                c.appearance(),
                c.personality(),
                c.dynamics()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Serialize story metadata plus the given block sequence into the context
/// payload. `blocks` is passed separately from `story` because edits and
/// regenerations condition on a prefix of the sequence.
pub fn build_context_prompt(story: &Story, blocks: &[StoryBlock], prompt: &str) -> String {
    let laws = story.laws();
    let reference = match &laws.reference {
        Reference::None => "Original".to_string(),
        Reference::BasedOn(work) => format!("based_on {work}"),
        Reference::InspiredBy(work) => format!("inspired_by {work}"),
    };

    let mut context = String::new();

    context.push_str("[LEIS DA HISTÓRIA]\n");
    context.push_str(&format!(
        "- Tempo: {}\n",
        or_fallback(&laws.temporal_context, "Indefinido (Crie conforme necessário)")
    ));
    context.push_str(&format!(
        "- Universo: {}\n",
        or_fallback(&laws.universe, "Realista")
    ));
    context.push_str(&format!(
        "- Tons: {}, {}\n",
        or_fallback(&laws.primary_tone, "Livre"),
        laws.secondary_tones.join(", ")
    ));
    context.push_str(&format!("- Referência: {reference}\n"));

    context.push_str("\n[REGRAS ABSOLUTAS]\n");
    context.push_str(or_fallback(story.rules(), "Liberdade criativa total."));
    context.push('\n');

    context.push_str("\n[PERSONAGENS]\n");
    let characters = render_characters(story);
    context.push_str(or_fallback(
        &characters,
        "Crie conforme a necessidade da trama.",
    ));
    context.push('\n');

    context.push_str("\n[EVENTOS CHAVE]\n");
    context.push_str(story.key_events());
    context.push('\n');

    context.push_str("\n[HISTÓRICO DA NARRATIVA]\n");
    context.push_str(&render_history(blocks));
    context.push('\n');

    context.push_str("\n[COMANDO ATUAL]\n");
    context.push_str(or_fallback(prompt, CONTINUE_SENTINEL));
    context.push('\n');

    context
}

/// Assemble the complete gateway request for one generation turn.
pub fn build_request(
    story: &Story,
    blocks: &[StoryBlock],
    action: GenerationAction,
    prompt: &str,
) -> LlmRequest {
    LlmRequest::new(
        build_system_instruction(action, prompt),
        build_context_prompt(story, blocks, prompt),
    )
    .with_temperature(DEFAULT_TEMPERATURE)
    .with_thinking_budget(DEFAULT_THINKING_BUDGET)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use fabula_domain::{Character, StoryLaws};

    use super::*;

    fn t0() -> chrono::DateTime<Utc> {
        Utc.timestamp_opt(0, 0).single().unwrap()
    }

    fn sample_story() -> Story {
        let mut story = Story::new(t0());
        story.set_rules("Sem redenção.", t0());
        story.set_key_events("A ponte caiu.", t0());
        story.set_laws(
            StoryLaws {
                temporal_context: "Século XIX".to_string(),
                universe: "Fantasia sombria".to_string(),
                primary_tone: "Gótico".to_string(),
                secondary_tones: vec!["Melancólico".to_string()],
                reference: Reference::InspiredBy("Drácula".to_string()),
            },
            t0(),
        );
        story.add_character(
            Character::new("Helena")
                .with_appearance("pálida")
                .with_personality("obstinada")
                .with_dynamics("lidera"),
            t0(),
        );
        story.append_user_block("Elas entram na floresta.", t0());
        story.append_ai_block("A floresta sussurra.", t0());
        story
    }

    #[test]
    fn sections_appear_in_priority_order() {
        let story = sample_story();
        let context = build_context_prompt(&story, story.blocks(), "continue");

        let order = [
            "[LEIS DA HISTÓRIA]",
            "[REGRAS ABSOLUTAS]",
            "[PERSONAGENS]",
            "[EVENTOS CHAVE]",
            "[HISTÓRICO DA NARRATIVA]",
            "[COMANDO ATUAL]",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|tag| context.find(tag).unwrap_or_else(|| panic!("missing {tag}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn metadata_and_roster_are_serialized() {
        let story = sample_story();
        let context = build_context_prompt(&story, story.blocks(), "continue");

        assert!(context.contains("- Tempo: Século XIX"));
        assert!(context.contains("- Tons: Gótico, Melancólico"));
        assert!(context.contains("- Referência: inspired_by Drácula"));
        assert!(context.contains("Sem redenção."));
        assert!(context.contains("PERSONAGEM: Helena"));
        assert!(context.contains("- Aparência: pálida"));
        assert!(context.contains("A ponte caiu."));
    }

    #[test]
    fn empty_fields_fall_back_to_open_defaults() {
        let mut story = Story::new(t0());
        story.set_laws(StoryLaws::default(), t0());
        let context = build_context_prompt(&story, story.blocks(), "");

        assert!(context.contains("- Tempo: Indefinido (Crie conforme necessário)"));
        assert!(context.contains("- Universo: Realista"));
        assert!(context.contains("- Tons: Livre, "));
        assert!(context.contains("- Referência: Original"));
        assert!(context.contains("Liberdade criativa total."));
        assert!(context.contains("Crie conforme a necessidade da trama."));
        assert!(context.contains("[COMANDO ATUAL]\ncontinue"));
    }

    #[test]
    fn history_tags_user_instructions_only() {
        let story = sample_story();
        let history = render_history(story.blocks());
        assert_eq!(
            history,
            "[ORDEM DO AUTOR]: Elas entram na floresta.\n\nA floresta sussurra."
        );
    }

    #[test]
    fn history_round_trips_active_versions() {
        let mut story = sample_story();
        let ai = story.blocks()[1].id();
        story.regenerate_ai_block(ai, "Texto B", t0()).unwrap();
        story.set_active_version(ai, 0, t0()).unwrap();

        let expected: Vec<String> = story
            .blocks()
            .iter()
            .map(|b| {
                if b.author().is_user() {
                    format!("[ORDEM DO AUTOR]: {}", b.active_text())
                } else {
                    b.active_text().to_string()
                }
            })
            .collect();
        assert_eq!(render_history(story.blocks()), expected.join("\n\n"));
        assert!(render_history(story.blocks()).contains("A floresta sussurra."));
    }

    #[test]
    fn action_instructions_differ_per_action() {
        let cont = build_system_instruction(GenerationAction::Continue, "x");
        let rewrite = build_system_instruction(GenerationAction::Rewrite, "mais tensão");
        let chapter = build_system_instruction(GenerationAction::NewChapter, "x");

        assert!(cont.contains("Continue a cena atual"));
        assert!(rewrite.contains("Reescreva o último trecho"));
        assert!(rewrite.contains("mais tensão"));
        assert!(chapter.contains("Inicie um novo capítulo"));
        for instruction in [&cont, &rewrite, &chapter] {
            assert!(instruction.starts_with("Você é um escritor literário"));
        }
    }

    #[test]
    fn request_carries_generation_parameters() {
        let story = sample_story();
        let request = build_request(
            &story,
            story.blocks(),
            GenerationAction::Continue,
            "continue",
        );
        assert_eq!(request.temperature, Some(DEFAULT_TEMPERATURE));
        assert_eq!(request.thinking_budget, Some(DEFAULT_THINKING_BUDGET));
        assert!(request.contents.contains("[HISTÓRICO DA NARRATIVA]"));
    }
}
