//! Outbound reply copy
//!
//! All user-facing text the bot sends, in one place. The wording is the
//! production copy and is treated as data: transitions pick messages,
//! they never compose prose inline.

use super::record::Topic;

pub fn root_menu() -> String {
    "¡Hola! Bienvenido(a) a Inted.\n\
     Por favor, elige una de las siguientes opciones (escribe el número):\n\n\
     1) Licitaciones\n\
     2) Proyectos Constructivos\n\
     3) Hablar con un representante\n\n\
     Si en cualquier momento deseas volver al menú, escribe \"menu\"."
        .to_string()
}

pub fn licitaciones_pitch() -> String {
    "*Consultoría en Licitaciones Públicas y/o Privadas*\n\
     Brindamos asesoramiento en todas las etapas: desde la documentación licitatoria hasta la ejecución del proyecto adjudicado.\n\n\
     Para más información: https://www.inted.com.ar/consultoria-licitaciones\n\n\
     ¿Te gustaría hablar con un representante? Escribe \"SI\" o \"NO\"."
        .to_string()
}

pub fn proyectos_pitch() -> String {
    "*Consultoría en Desarrollo de Proyectos Constructivos*\n\
     Nuestro asesoramiento integral en la gestoría de trámites requeridos para la realización de proyectos constructivos.\n\n\
     Para más información: https://www.inted.com.ar/proyectos-constructivos\n\n\
     ¿Te gustaría hablar con un representante? Escribe \"SI\" o \"NO\"."
        .to_string()
}

pub fn hours_status(within_hours: bool) -> String {
    if within_hours {
        "Estamos *dentro* de nuestro horario de atención (Lunes a Viernes, 09:00 a 18:00).".to_string()
    } else {
        "Estamos *fuera* de nuestro horario de atención (Lunes a Viernes, 09:00 a 18:00).".to_string()
    }
}

pub fn unrecognized_option() -> String {
    "Lo siento, no reconozco esa opción.\n\
     Si deseas volver al menú, escribe \"menu\"."
        .to_string()
}

pub fn handoff_accepted_name_prompt() -> String {
    "¡Excelente! Primero, ¿podrías indicar tu nombre completo?".to_string()
}

pub fn back_to_menu() -> String {
    "Entendido. Volvamos al menú principal.".to_string()
}

pub fn yes_no_reprompt() -> String {
    "Por favor responde \"SI\" o \"NO\".".to_string()
}

pub fn representante_name_prompt() -> String {
    "Por favor, indícanos tu nombre completo:".to_string()
}

pub fn invalid_name() -> String {
    "❌ Por favor ingresa un nombre válido (entre 2 y 50 caracteres).".to_string()
}

/// The licitaciones prompt carries an extra connective; the other flows
/// share the short form.
pub fn email_prompt(topic: Topic) -> String {
    match topic {
        Topic::Licitaciones => {
            "Gracias. Ahora, ¿podrías compartir tu dirección de email?".to_string()
        }
        Topic::Proyectos | Topic::Representante => {
            "Gracias. ¿Podrías compartir tu dirección de email?".to_string()
        }
    }
}

pub fn invalid_email() -> String {
    "❌ Por favor ingresa un email válido (ejemplo: usuario@dominio.com).".to_string()
}

pub fn inquiry_prompt(topic: Topic) -> String {
    match topic {
        Topic::Licitaciones | Topic::Proyectos => {
            "Por favor, cuéntanos tu consulta completa:".to_string()
        }
        Topic::Representante => {
            "Por favor, cuéntanos brevemente tu motivo de consulta:".to_string()
        }
    }
}

pub fn invalid_inquiry(topic: Topic) -> String {
    match topic {
        Topic::Licitaciones | Topic::Proyectos => {
            "❌ Por favor describe tu consulta con más detalle (mínimo 10 caracteres).".to_string()
        }
        Topic::Representante => {
            "❌ Por favor describe brevemente tu consulta (mínimo 2 caracteres).".to_string()
        }
    }
}

pub fn inquiry_received(nombre: &str, consulta: &str) -> String {
    format!(
        "¡Perfecto, {nombre}! Hemos recibido tu consulta:\n\n\
         \"{consulta}\"\n\n\
         Te contactaremos pronto. Gracias por comunicarte con Inted."
    )
}

pub fn representante_confirmation(nombre: &str, consulta: &str, within_hours: bool) -> String {
    if within_hours {
        format!(
            "¡Perfecto, {nombre}!\n\
             Hemos recibido tu información: \"{consulta}\"\n\n\
             En breve, un representante humano continuará la conversación contigo."
        )
    } else {
        format!(
            "¡Perfecto, {nombre}!\n\
             Hemos recibido tu información: \"{consulta}\"\n\n\
             En cuanto estemos en horario, un representante se comunicará contigo."
        )
    }
}

pub fn rate_limited() -> String {
    "⚠️ Has enviado demasiados mensajes. Por favor, espera unos minutos antes de continuar.".to_string()
}

pub fn outside_business_hours() -> String {
    "🕐 *Horario de Atención*\n\n\
     Nuestro horario de atención es:\n\
     📅 Lunes a Viernes\n\
     🕘 9:00 AM - 6:00 PM\n\n\
     Tu mensaje ha sido registrado y te responderemos en el próximo horario hábil."
        .to_string()
}
