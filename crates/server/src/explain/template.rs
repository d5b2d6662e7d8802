use chess_core::Phase;

use super::{ExplainInput, Lang};

struct Phrases {
    assessment_title: &'static str,
    turn_to_move: String,
    material_equal: &'static str,
    in_check: String,
    checkmate: String,
    stalemate: &'static str,
    analysis_title: &'static str,
    rank_labels: [&'static str; 3],
    evaluation: &'static str,
    forced_mate: &'static str,
    getting_mated: String,
    decisive_advantage: String,
    clear_advantage: String,
    slight_edge: String,
    losing: String,
    worse: String,
    opponent_edge: String,
    equal: &'static str,
    why_sequence: &'static str,
    after_move: &'static str,
    expected_response: &'static str,
    game_continues: &'static str,
    followed_by: &'static str,
    further_moves: &'static str,
    strategic_title: &'static str,
    opening_advice: &'static str,
    middlegame_advice: &'static str,
    endgame_advice: &'static str,
    can_castle: &'static str,
    and_word: &'static str,
    api_tip: &'static str,
}

impl Phrases {
    fn new(lang: Lang, white_to_move: bool, phase: Phase) -> Self {
        let turn = lang.side(white_to_move);
        let opponent = lang.side(!white_to_move);

        match lang {
            Lang::En => Self {
                assessment_title: "**Position Assessment**",
                turn_to_move: format!("It's {turn}'s turn to move. The game is in the {}.", phase.as_str()),
                material_equal: "Material is equal.",
                in_check: format!("⚠️ **{turn} is in check!** The immediate priority is to escape the check."),
                checkmate: format!("♔ **Checkmate!** {opponent} wins!"),
                stalemate: "**Stalemate** - The game is a draw.",
                analysis_title: "**Analysis of Key Moves**",
                rank_labels: ["Best move", "Second best", "Third best"],
                evaluation: "Evaluation",
                forced_mate: "This move leads to a **forced checkmate**!",
                getting_mated: format!(
                    "⚠️ Despite being the best option, {turn} is getting checkmated. The position is lost."
                ),
                decisive_advantage: format!(
                    "{turn} gains a **decisive advantage** with this move. The position becomes winning."
                ),
                clear_advantage: format!(
                    "This move gives {turn} a **clear advantage**. The position is favorable."
                ),
                slight_edge: format!("{turn} maintains a **slight edge** with this move."),
                losing: format!("⚠️ Even with the best play, {turn} is in a **losing position**."),
                worse: format!("⚠️ {turn} is **worse** here, but this move limits the damage."),
                opponent_edge: format!("{opponent} has a slight edge, but the position remains playable."),
                equal: "The position is **roughly equal** after this move.",
                why_sequence: "**Why this sequence?**",
                after_move: "After",
                expected_response: "the expected response is",
                game_continues: "The game would likely continue:",
                followed_by: "followed by",
                further_moves: "Further moves in this line:",
                strategic_title: "**Strategic Considerations**",
                opening_advice: "• In the opening, focus on piece development, controlling the center, and king safety.",
                middlegame_advice: "• In the middlegame, look for tactical opportunities and improve piece coordination.",
                endgame_advice: "• In the endgame, king activity and pawn promotion become critical factors.",
                can_castle: "can still castle",
                and_word: " and ",
                api_tip: "*For more detailed strategic insights with explanations of tactical motifs, add your OpenAI API key.*",
            },
            Lang::Pt => Self {
                assessment_title: "**Avaliação da Posição**",
                turn_to_move: format!(
                    "É a vez das {turn} jogarem. O jogo está na fase de {}.",
                    phase.as_str_pt()
                ),
                material_equal: "O material está igual.",
                in_check: format!("⚠️ **{turn} estão em xeque!** A prioridade imediata é escapar do xeque."),
                checkmate: format!("♔ **Xeque-mate!** {opponent} vencem!"),
                stalemate: "**Afogamento** - O jogo é empate.",
                analysis_title: "**Análise dos Lances Principais**",
                rank_labels: ["Melhor lance", "Segundo melhor", "Terceiro melhor"],
                evaluation: "Avaliação",
                forced_mate: "Este lance leva a um **xeque-mate forçado**!",
                getting_mated: format!(
                    "⚠️ Apesar de ser a melhor opção, {turn} serão xeque-mateadas. A posição está perdida."
                ),
                decisive_advantage: format!(
                    "{turn} obtêm uma **vantagem decisiva** com este lance. A posição fica ganha."
                ),
                clear_advantage: format!(
                    "Este lance dá a {turn} uma **vantagem clara**. A posição é favorável."
                ),
                slight_edge: format!("{turn} mantêm uma **ligeira vantagem** com este lance."),
                losing: format!("⚠️ Mesmo com o melhor jogo, {turn} estão em **posição perdida**."),
                worse: format!("⚠️ {turn} estão **piores** aqui, mas este lance limita os danos."),
                opponent_edge: format!("{opponent} têm ligeira vantagem, mas a posição continua jogável."),
                equal: "A posição é **aproximadamente igual** após este lance.",
                why_sequence: "**Por que esta sequência?**",
                after_move: "Após",
                expected_response: "a resposta esperada é",
                game_continues: "O jogo provavelmente continuaria:",
                followed_by: "seguido de",
                further_moves: "Lances seguintes nesta linha:",
                strategic_title: "**Considerações Estratégicas**",
                opening_advice: "• Na abertura, foque no desenvolvimento das peças, controle do centro e segurança do rei.",
                middlegame_advice: "• No meio-jogo, busque oportunidades táticas e melhore a coordenação das peças.",
                endgame_advice: "• No final, a atividade do rei e a promoção de peões são fatores críticos.",
                can_castle: "ainda podem rocar",
                and_word: " e ",
                api_tip: "*Para insights estratégicos mais detalhados com explicações de motivos táticos, adicione sua chave de API do OpenAI.*",
            },
        }
    }

    fn material_advantage(&self, lang: Lang, side: &str, pawns: i32) -> String {
        match lang {
            Lang::En => format!("{side} has a material advantage of {pawns} pawn(s) worth of material."),
            Lang::Pt => format!("{side} têm vantagem material de {pawns} peão(s)."),
        }
    }

    /// Verdict for a move, judged on the score from the mover's side.
    fn verdict(&self, score: &str, score_value: i32) -> &str {
        if score.starts_with("Mate in") {
            self.forced_mate
        } else if score.starts_with("Mated in") {
            &self.getting_mated
        } else if score_value > 300 {
            &self.decisive_advantage
        } else if score_value > 100 {
            &self.clear_advantage
        } else if score_value > 30 {
            &self.slight_edge
        } else if score_value < -300 {
            &self.losing
        } else if score_value < -100 {
            &self.worse
        } else if score_value < -30 {
            &self.opponent_edge
        } else {
            self.equal
        }
    }
}

/// Markdown explanation built without a language model.
pub fn template_explanation(input: &ExplainInput<'_>) -> String {
    let lang = input.lang;
    let ctx = input.context;
    let txt = Phrases::new(lang, input.white_to_move, ctx.phase);
    let mut lines: Vec<String> = Vec::new();

    lines.push(txt.assessment_title.into());
    lines.push(txt.turn_to_move.clone());

    let balance = ctx.material_balance.balance;
    if balance > 0 {
        lines.push(txt.material_advantage(lang, lang.side(true), balance));
    } else if balance < 0 {
        lines.push(txt.material_advantage(lang, lang.side(false), balance.abs()));
    } else {
        lines.push(txt.material_equal.into());
    }

    if ctx.is_check {
        lines.push(txt.in_check.clone());
    }
    if ctx.is_checkmate {
        lines.push(txt.checkmate.clone());
        return lines.join("\n");
    }
    if ctx.is_stalemate {
        lines.push(txt.stalemate.into());
        return lines.join("\n");
    }

    lines.push(String::new());

    if !input.moves.is_empty() {
        lines.push(txt.analysis_title.into());

        for mv in input.moves.iter().take(3) {
            let rank_label = match txt.rank_labels.get(mv.rank.wrapping_sub(1)) {
                Some(label) => label.to_string(),
                None => format!("#{}", mv.rank),
            };
            lines.push(format!(
                "\n**{rank_label}: `{}`** ({}: {})",
                mv.move_san, txt.evaluation, mv.score
            ));
            lines.push(txt.verdict(&mv.score, mv.score_value).to_string());

            let full = &mv.full_line;
            if full.len() >= 2 {
                lines.push(format!("\n{}", txt.why_sequence));
                lines.push(format!(
                    "{} `{}`, {} `{}`.",
                    txt.after_move, full[0], txt.expected_response, full[1]
                ));
                if full.len() >= 4 {
                    lines.push(format!(
                        "{} `{}` {} `{}`.",
                        txt.game_continues, full[2], txt.followed_by, full[3]
                    ));
                }
                if full.len() >= 5 {
                    let remaining: Vec<String> = full[4..full.len().min(7)]
                        .iter()
                        .map(|m| format!("`{m}`"))
                        .collect();
                    lines.push(format!("{} {}", txt.further_moves, remaining.join(", ")));
                }
            }
        }
    }

    lines.push(String::new());

    lines.push(txt.strategic_title.into());
    lines.push(
        match ctx.phase {
            Phase::Opening => txt.opening_advice,
            Phase::Middlegame => txt.middlegame_advice,
            Phase::Endgame => txt.endgame_advice,
        }
        .into(),
    );

    if ctx.phase != Phase::Endgame {
        let mut castle_info = Vec::new();
        if ctx.white_can_castle() {
            castle_info.push(format!("{} {}", lang.side(true), txt.can_castle));
        }
        if ctx.black_can_castle() {
            castle_info.push(format!("{} {}", lang.side(false), txt.can_castle));
        }
        if !castle_info.is_empty() {
            lines.push(format!("• {}.", castle_info.join(txt.and_word)));
        }
    }

    lines.push(String::new());
    lines.push(txt.api_tip.into());

    lines.join("\n")
}
