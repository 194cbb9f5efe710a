//! Static interview question bank appended to every candidate report.

pub struct InterviewQuestion {
    pub question: &'static str,
    pub focus: &'static str,
}

pub struct QuestionCategory {
    pub category: &'static str,
    pub questions: [InterviewQuestion; 3],
}

pub const QUESTION_BANK: [QuestionCategory; 3] = [
    QuestionCategory {
        category: "Technical",
        questions: [
            InterviewQuestion {
                question: "Walk us through your most technically challenging project.",
                focus: "Technical depth and problem-solving ability",
            },
            InterviewQuestion {
                question: "How do you balance code quality against delivery pressure?",
                focus: "Project management and quality awareness",
            },
            InterviewQuestion {
                question: "How do you approach a technical problem you have never seen before?",
                focus: "Learning ability and way of thinking",
            },
        ],
    },
    QuestionCategory {
        category: "Project experience",
        questions: [
            InterviewQuestion {
                question: "Describe an important project that you led.",
                focus: "Leadership and project management",
            },
            InterviewQuestion {
                question: "What was the hardest problem in that project and how was it solved?",
                focus: "Problem-solving ability",
            },
            InterviewQuestion {
                question: "How did you collaborate with the rest of the team to deliver it?",
                focus: "Teamwork",
            },
        ],
    },
    QuestionCategory {
        category: "General",
        questions: [
            InterviewQuestion {
                question: "What are your career plans and development goals?",
                focus: "Career planning and growth potential",
            },
            InterviewQuestion {
                question: "How do you keep learning and improving?",
                focus: "Learning ability and self-motivation",
            },
            InterviewQuestion {
                question: "What do you know about our company and this role?",
                focus: "Motivation and fit",
            },
        ],
    },
];
