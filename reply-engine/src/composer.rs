//! Reply assembly from a fixed per-branch template table.
//!
//! Pure string work: no scoring happens here. The newline structure is part
//! of the output contract.

use crate::api_types::ReplyBranch;

const SIGNATURE: &str = "Best regards,\nSupport Team";
const DEFAULT_HEADING: &str = "Additionally, you might find this information helpful:";

/// Literal texts for one branch. `{title}` in openings is substituted.
#[derive(Debug)]
pub struct ReplyTemplate {
    pub opening: &'static str,
    /// Opening used with the canned body, when it differs.
    pub fallback_opening: Option<&'static str>,
    /// Prefix placed right before the primary content.
    pub lead_in: &'static str,
    pub supplement_heading: &'static str,
    pub closing: &'static str,
    /// Body used when no document qualifies.
    pub canned: &'static str,
}

const FAQ_MATCH: ReplyTemplate = ReplyTemplate {
    opening: "Thank you for contacting our support team regarding \"{title}\". I'm happy to help with your question.",
    fallback_opening: None,
    lead_in: "",
    supplement_heading: DEFAULT_HEADING,
    closing: "If you need any further clarification or have additional questions, please don't hesitate to ask.",
    canned: "If you need any further clarification or have additional questions, please don't hesitate to ask.",
};

const SUBSCRIPTION: ReplyTemplate = ReplyTemplate {
    opening: "Thank you for your inquiry about our subscription options. I'd be happy to help you with that.",
    fallback_opening: None,
    lead_in: "",
    supplement_heading: DEFAULT_HEADING,
    closing: "If you have any specific questions about our plans or need assistance with your subscription, please let me know and I'll be glad to provide more detailed guidance.",
    canned: "We offer several different subscription tiers to meet different needs. You can manage your subscription through your account dashboard in the \"Subscription\" section.\n\n\
             If you have any specific questions about our plans or need assistance with your subscription, please let me know and I'll be glad to provide more detailed guidance.",
};

const TECHNICAL: ReplyTemplate = ReplyTemplate {
    opening: "I'm sorry to hear you're experiencing technical difficulties with \"{title}\". Let me help you resolve this issue.",
    fallback_opening: None,
    lead_in: "Based on our documentation:\n\n",
    supplement_heading: "Additionally, you might find these troubleshooting steps helpful:",
    closing: "If these steps don't resolve your issue, please provide more specific details about the problem you're encountering, including any error messages you're seeing, and I'll be happy to assist you further.",
    canned: "To better assist you, could you please provide the following information:\n\n\
             1. What specific error messages are you seeing?\n\
             2. What steps have you already tried?\n\
             3. What browser/device are you using?\n\n\
             With this information, I'll be able to provide you with more targeted troubleshooting steps.",
};

const PASSWORD_RESET: ReplyTemplate = ReplyTemplate {
    opening: "Thank you for reaching out about resetting your password. I'm happy to help.",
    fallback_opening: None,
    lead_in: "",
    supplement_heading: DEFAULT_HEADING,
    closing: "If you have any issues with the password reset process, please let me know and I'll be glad to assist further.",
    canned: "To reset your password, please follow these steps:\n\n\
             1. Go to the login page on our website\n\
             2. Click on the \"Forgot Password\" link below the login form\n\
             3. Enter the email address associated with your account\n\
             4. Check your email for a password reset link\n\
             5. Click the link and follow the instructions to create a new password\n\n\
             If you don't receive the password reset email within a few minutes, please check your spam or junk folder. If you still don't see it, please let me know and I'll help you troubleshoot further.",
};

const ACCOUNT: ReplyTemplate = ReplyTemplate {
    opening: "Thank you for reaching out about your account. I'm here to help.",
    fallback_opening: None,
    lead_in: "Regarding your account inquiry:\n\n",
    supplement_heading: DEFAULT_HEADING,
    closing: "If you have any other questions about your account, please don't hesitate to ask.",
    canned: "If you're having trouble accessing your account, here are some steps you can take:\n\n\
             1. Try resetting your password using the \"Forgot Password\" link on the login page\n\
             2. Ensure you're using the correct email address associated with your account\n\
             3. Check if your account has been verified (you should have received a verification email)\n\n\
             If you continue to experience issues, please provide more details about the specific problem you're encountering, and I'll be happy to assist you further.",
};

const REFUND: ReplyTemplate = ReplyTemplate {
    opening: "Thank you for contacting us regarding a refund for \"{title}\". I understand how important this matter is to you.",
    fallback_opening: None,
    lead_in: "Regarding our refund policy:\n\n",
    supplement_heading: DEFAULT_HEADING,
    closing: "If you need further assistance with processing your refund or have any other questions, please don't hesitate to let me know. I'm here to help.",
    canned: "To process your refund request, I'll need some additional information:\n\n\
             1. The date of your purchase\n\
             2. The order or transaction number (if available)\n\
             3. The reason for the refund request\n\n\
             Once I have this information, I'll be able to assist you further with your refund request according to our company's refund policy.",
};

const FEATURE: ReplyTemplate = ReplyTemplate {
    opening: "Thank you for your inquiry about our features related to \"{title}\". I'm happy to provide you with information about this functionality.",
    fallback_opening: Some(
        "Thank you for your inquiry about features related to \"{title}\". I'd be happy to provide you with more information.",
    ),
    lead_in: "",
    supplement_heading: DEFAULT_HEADING,
    closing: "If you have any questions about how to use this feature or need further assistance, please don't hesitate to ask.",
    canned: "To better assist you with your specific feature request, could you please provide more details about what you're trying to accomplish? This will help me provide you with the most relevant information about our functionality.",
};

const GENERAL: ReplyTemplate = ReplyTemplate {
    opening: "Thank you for contacting our support team regarding \"{title}\". I appreciate you reaching out to us.",
    fallback_opening: None,
    lead_in: "Based on the information you've provided, I believe the following may help address your inquiry:\n\n",
    supplement_heading: DEFAULT_HEADING,
    closing: "If you have any further questions or need additional assistance, please don't hesitate to let me know. I'm here to help.",
    canned: "I've reviewed your inquiry and would like to help you resolve this matter. To better assist you, could you please provide some additional details about your specific situation? This will help me provide you with the most accurate and helpful information.\n\n\
             If you have any further questions or need additional assistance, please don't hesitate to let me know. I'm here to help.",
};

const ACKNOWLEDGEMENT: ReplyTemplate = ReplyTemplate {
    opening: "Thank you for contacting our support team regarding \"{title}\". We have received your request and are working on addressing your concerns.",
    fallback_opening: None,
    lead_in: "While we prepare a more detailed response, you might find the following information helpful:\n\n",
    supplement_heading: DEFAULT_HEADING,
    closing: "Our team will review the details you've provided and get back to you with a more specific response shortly. In the meantime, please let us know if you have any additional information that might help us resolve your issue more efficiently.",
    canned: "Our team will review the details you've provided and get back to you with a more specific response shortly. In the meantime, please let us know if you have any additional information that might help us resolve your issue more efficiently.",
};

/// Template for `branch`. Generated replies are never templated and share
/// the general texts.
pub fn template(branch: ReplyBranch) -> &'static ReplyTemplate {
    match branch {
        ReplyBranch::FaqMatch => &FAQ_MATCH,
        ReplyBranch::Subscription => &SUBSCRIPTION,
        ReplyBranch::Technical => &TECHNICAL,
        ReplyBranch::Account => &ACCOUNT,
        ReplyBranch::PasswordReset => &PASSWORD_RESET,
        ReplyBranch::Refund => &REFUND,
        ReplyBranch::Feature => &FEATURE,
        ReplyBranch::General | ReplyBranch::Generated => &GENERAL,
        ReplyBranch::Acknowledgement => &ACKNOWLEDGEMENT,
    }
}

fn with_title(text: &str, title: &str) -> String {
    text.replace("{title}", title)
}

/// Reply around selected content, with an optional supplement paragraph.
pub fn compose_reply(
    branch: ReplyBranch,
    customer_name: &str,
    title: &str,
    primary: &str,
    supplement: Option<&str>,
) -> String {
    let t = template(branch);
    let mut out = format!(
        "Dear {customer_name},\n\n{}\n\n{}{primary}",
        with_title(t.opening, title),
        t.lead_in
    );
    if let Some(s) = supplement.filter(|s| !s.is_empty()) {
        out.push_str(&format!("\n\n{}\n\n{s}", t.supplement_heading));
    }
    out.push_str(&format!("\n\n{}\n\n{SIGNATURE}", t.closing));
    out
}

/// Reply built from the branch's canned body.
pub fn compose_fallback(branch: ReplyBranch, customer_name: &str, title: &str) -> String {
    let t = template(branch);
    let opening = t.fallback_opening.unwrap_or(t.opening);
    format!(
        "Dear {customer_name},\n\n{}\n\n{}\n\n{SIGNATURE}",
        with_title(opening, title),
        t.canned
    )
}

/// Acknowledgement, quoting `helpful` content when there is some.
pub fn compose_acknowledgement(customer_name: &str, title: &str, helpful: Option<&str>) -> String {
    match helpful {
        Some(content) => compose_reply(ReplyBranch::Acknowledgement, customer_name, title, content, None),
        None => compose_fallback(ReplyBranch::Acknowledgement, customer_name, title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faq_reply_layout() {
        let r = compose_reply(
            ReplyBranch::FaqMatch,
            "Ana",
            "Refund request",
            "Refunds are processed within 5 business days.",
            None,
        );
        assert_eq!(
            r,
            "Dear Ana,\n\nThank you for contacting our support team regarding \"Refund request\". \
             I'm happy to help with your question.\n\nRefunds are processed within 5 business days.\n\n\
             If you need any further clarification or have additional questions, please don't hesitate to ask.\n\n\
             Best regards,\nSupport Team"
        );
    }

    #[test]
    fn supplement_uses_branch_heading() {
        let r = compose_reply(ReplyBranch::Technical, "Bo", "Crash", "Restart the app.", Some("Clear the cache."));
        assert!(r.contains(
            "Based on our documentation:\n\nRestart the app.\n\n\
             Additionally, you might find these troubleshooting steps helpful:\n\nClear the cache.\n\n"
        ));

        let r = compose_reply(ReplyBranch::Refund, "Bo", "Refund", "Policy.", Some("More."));
        assert!(r.contains("\n\nAdditionally, you might find this information helpful:\n\nMore.\n\n"));
    }

    #[test]
    fn empty_supplement_is_omitted() {
        let r = compose_reply(ReplyBranch::Account, "Bo", "Login", "Steps.", Some(""));
        assert!(!r.contains("Additionally"));
    }

    #[test]
    fn general_fallback_asks_for_details() {
        let r = compose_fallback(ReplyBranch::General, "Customer", "Dark mode");
        assert!(r.starts_with("Dear Customer,\n\nThank you for contacting our support team regarding \"Dark mode\"."));
        assert!(r.contains("could you please provide some additional details"));
        assert!(r.ends_with("I'm here to help.\n\nBest regards,\nSupport Team"));
    }

    #[test]
    fn feature_fallback_has_its_own_opening() {
        let r = compose_fallback(ReplyBranch::Feature, "Bo", "Export");
        assert!(r.contains("Thank you for your inquiry about features related to \"Export\". I'd be happy"));
    }

    #[test]
    fn acknowledgement_variants() {
        let plain = compose_acknowledgement("Bo", "Login", None);
        assert!(plain.contains("We have received your request"));
        assert!(!plain.contains("While we prepare"));

        let informed = compose_acknowledgement("Bo", "Login", Some("Try the reset link."));
        assert!(informed.contains(
            "While we prepare a more detailed response, you might find the following information helpful:\n\n\
             Try the reset link.\n\nOur team will review"
        ));
    }

    #[test]
    fn every_reply_ends_with_signature() {
        for b in [
            ReplyBranch::FaqMatch,
            ReplyBranch::Subscription,
            ReplyBranch::Technical,
            ReplyBranch::Account,
            ReplyBranch::PasswordReset,
            ReplyBranch::Refund,
            ReplyBranch::Feature,
            ReplyBranch::General,
            ReplyBranch::Acknowledgement,
        ] {
            assert!(compose_fallback(b, "X", "Y").ends_with("\n\nBest regards,\nSupport Team"));
            assert!(compose_reply(b, "X", "Y", "Z", None).ends_with("\n\nBest regards,\nSupport Team"));
        }
    }
}
